//! DNS provider capability trait
//!
//! Abstracts the zone/record CRUD surface of one authoritative DNS
//! provider. Implementations make the wire calls and classify failures
//! into the [`crate::Error`] taxonomy; they decide nothing.
//!
//! Implementations must:
//! - report authentication failures as `Error::Unauthorized`, transient
//!   transport failures (timeout, connect error, 5xx) as
//!   `Error::ProviderUnavailable`, so the reconciler and the HTTP layer
//!   can tell them apart
//! - bound every outbound call with a timeout
//! - perform no retries; a failed call surfaces immediately

use crate::error::Result;
use crate::model::{RecordRef, RecordSpec, RecordType, ZoneRef};
use async_trait::async_trait;

/// Per-request provider credentials
///
/// Passed explicitly into the backend factory on every request; no
/// process-wide credential state exists anywhere in the system.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// API token
    pub token: String,
    /// Account email, for providers whose auth scheme wants one
    pub email: Option<String>,
}

impl Credentials {
    pub fn new(token: impl Into<String>, email: Option<String>) -> Self {
        Self {
            token: token.into(),
            email,
        }
    }
}

// The token never appears in logs or panic messages.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<REDACTED>")
            .field("email", &self.email)
            .finish()
    }
}

/// Trait for authoritative DNS provider implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait DnsBackend: Send + Sync {
    /// List zones whose name exactly matches `name`
    ///
    /// An empty result is not an error here; the caller decides whether
    /// absence is fatal.
    async fn list_zones(&self, name: &str) -> Result<Vec<ZoneRef>>;

    /// List records in a zone, optionally filtered by name and type
    ///
    /// Implementations should push the filters to the provider when its
    /// API supports server-side filtering; the caller re-filters either
    /// way, so client-side filtering is an acceptable fallback.
    async fn list_records(
        &self,
        zone_id: &str,
        name: Option<&str>,
        record_type: Option<RecordType>,
    ) -> Result<Vec<RecordRef>>;

    /// Create a record in the zone, returning the provider's view of it
    async fn create_record(&self, zone_id: &str, spec: &RecordSpec) -> Result<RecordRef>;

    /// Rewrite an existing record by id, returning the provider's view
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        spec: &RecordSpec,
    ) -> Result<RecordRef>;

    /// Provider name for logging
    fn backend_name(&self) -> &'static str;
}

/// Helper trait for constructing backends from per-request credentials
pub trait BackendFactory: Send + Sync {
    /// Create a backend bound to `credentials`
    fn create(&self, credentials: &Credentials) -> Result<Box<dyn DnsBackend>>;
}
