//! Shared handler state
//!
//! Holds the two seams the request handler needs: a backend factory
//! (credentials arrive per request, so backends are built per request)
//! and an address source for auto-discovery. No request data, no
//! credentials, and no provider state live here.

use dyndns_core::traits::{AddressSource, BackendFactory};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub backend_factory: Arc<dyn BackendFactory>,
    pub address_source: Arc<dyn AddressSource>,
}

impl AppState {
    pub fn new(
        backend_factory: Arc<dyn BackendFactory>,
        address_source: Arc<dyn AddressSource>,
    ) -> Self {
        Self {
            backend_factory,
            address_source,
        }
    }
}
