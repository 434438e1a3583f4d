//! Request handlers for the update and health endpoints
//!
//! `GET /` carries everything in query parameters: provider credentials
//! (`token`, optional `email`), the target (`zone`, optional `record`
//! label), and optionally an explicit address (`ipv4` / `ipv6`). With no
//! explicit address the handler discovers a global IPv6 address and
//! reconciles the AAAA record, matching the original deployment's
//! IPv6-first behavior. When both `ipv4` and `ipv6` are supplied the
//! IPv6 flow wins.

use crate::errors::ApiError;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use dyndns_core::model::AddressFamily;
use dyndns_core::traits::Credentials;
use dyndns_core::{resolve_address, DesiredState, Error, Reconciler};
use serde::{Deserialize, Serialize};
use tracing::info;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(update))
        .route("/healthz", get(healthz))
}

#[derive(Debug, Deserialize)]
pub struct UpdateParams {
    token: Option<String>,
    email: Option<String>,
    zone: Option<String>,
    record: Option<String>,
    ipv4: Option<String>,
    ipv6: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusBody {
    status: &'static str,
    message: String,
}

impl StatusBody {
    fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
        }
    }
}

async fn update(
    State(state): State<AppState>,
    Query(params): Query<UpdateParams>,
) -> Result<Json<StatusBody>, ApiError> {
    info!(
        zone = params.zone.as_deref().unwrap_or(""),
        record = params.record.as_deref().unwrap_or(""),
        explicit_v4 = params.ipv4.is_some(),
        explicit_v6 = params.ipv6.is_some(),
        "update request received"
    );

    let token = require(params.token.as_deref(), "token")?;
    let zone = require(params.zone.as_deref(), "zone")?;

    // IPv6 precedence: an explicit ipv6 parameter (or nothing at all)
    // selects the AAAA flow; only an explicit lone ipv4 selects A.
    let (family, explicit) = match (params.ipv6.as_deref(), params.ipv4.as_deref()) {
        (Some(v6), _) if !v6.is_empty() => (AddressFamily::V6, Some(v6)),
        (_, Some(v4)) if !v4.is_empty() => (AddressFamily::V4, Some(v4)),
        _ => (AddressFamily::V6, None),
    };

    let content = resolve_address(explicit, family, state.address_source.as_ref()).await?;

    let credentials = Credentials::new(token, params.email.clone());
    let backend = state.backend_factory.create(&credentials)?;

    let desired = DesiredState::new(zone, params.record.as_deref(), content);
    let outcome = Reconciler::new(backend.as_ref()).reconcile(&desired).await?;

    info!(
        record = %outcome.record().name,
        content = %outcome.record().content,
        mutated = outcome.mutated(),
        "reconciliation finished"
    );

    Ok(Json(StatusBody::success("Update successful.")))
}

async fn healthz() -> Json<StatusBody> {
    Json(StatusBody::success("OK"))
}

fn require<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, ApiError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError(Error::invalid_input(format!(
            "Missing {name} URL parameter."
        )))),
    }
}
