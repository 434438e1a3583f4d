// # dyndnsd
//
// Thin HTTP layer over `dyndns-core`: parses inbound parameters, runs
// one reconciliation per request, and maps outcomes to JSON responses.
// No DNS decisions live here.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod state;

pub use config::Config;
pub use state::AppState;

use axum::Router;

/// Build the application router with the given seams
pub fn app(state: AppState) -> Router {
    handlers::routes().with_state(state)
}
