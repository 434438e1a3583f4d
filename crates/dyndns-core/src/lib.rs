// # dyndns-core
//
// Core library for the HTTP-triggered dynamic DNS updater.
//
// ## Architecture Overview
//
// - **DnsBackend**: trait over one authoritative DNS provider's
//   zone/record CRUD surface
// - **AddressSource**: trait for discovering the caller's public address
// - **Reconciler**: decides create / update / no-op for one record and
//   performs at most one mutating provider call per invocation
// - **resolve_address**: explicit-address validation with discovery
//   fallback
//
// ## Design Principles
//
// 1. **Request-scoped**: every entity lives for one reconciliation; the
//    provider's record store is the only system of record
// 2. **Seams as traits**: the reconciler is implemented and tested
//    against in-memory fakes, independent of any real network call
// 3. **No hidden coordination**: no retries, no caching, no background
//    tasks; failed calls surface immediately

pub mod address;
pub mod error;
pub mod model;
pub mod reconciler;
pub mod traits;

// Re-export core types for convenience
pub use address::resolve_address;
pub use error::{Error, Result};
pub use model::{
    AddressFamily, DesiredState, ReconcileOutcome, RecordRef, RecordSpec, RecordType, Ttl, ZoneRef,
};
pub use reconciler::Reconciler;
pub use traits::{AddressSource, BackendFactory, Credentials, DnsBackend};
