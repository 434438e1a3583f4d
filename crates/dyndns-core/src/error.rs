//! Error taxonomy for the reconciliation engine
//!
//! Every failure an operation can surface maps to exactly one of these
//! kinds, so the HTTP layer can translate them to status codes without
//! inspecting message text.

use thiserror::Error;

/// Result type alias for reconciliation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the dynamic DNS updater
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing caller input (empty zone, bad address, ...)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No qualifying address could be discovered or validated
    #[error("address unavailable: {0}")]
    AddressUnavailable(String),

    /// The provider account holds no zone with the requested name
    #[error("zone not found: {0}")]
    ZoneNotFound(String),

    /// A flow that requires an existing record found none
    #[error("record not found: {0}")]
    RecordNotFound(String),

    /// Provider rejected the credentials (401/403)
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Transient provider failure: timeout, network error, 5xx
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Unexpected or unclassified failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an address unavailable error
    pub fn address_unavailable(msg: impl Into<String>) -> Self {
        Self::AddressUnavailable(msg.into())
    }

    /// Create a zone not found error
    pub fn zone_not_found(msg: impl Into<String>) -> Self {
        Self::ZoneNotFound(msg.into())
    }

    /// Create a record not found error
    pub fn record_not_found(msg: impl Into<String>) -> Self {
        Self::RecordNotFound(msg.into())
    }

    /// Create an unauthorized error
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Create a provider unavailable error
    pub fn provider_unavailable(msg: impl Into<String>) -> Self {
        Self::ProviderUnavailable(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
