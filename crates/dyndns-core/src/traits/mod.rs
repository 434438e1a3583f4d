//! Capability traits at the system's seams
//!
//! The reconciler only ever talks to the outside world through these
//! traits, so it can be exercised against in-memory fakes without any
//! network access.

pub mod address_source;
pub mod dns_backend;

pub use address_source::AddressSource;
pub use dns_backend::{BackendFactory, Credentials, DnsBackend};
