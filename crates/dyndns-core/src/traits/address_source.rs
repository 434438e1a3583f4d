//! Address discovery capability trait
//!
//! An address source produces the caller's current public address for one
//! family. Discovery happens per request; sources keep no state between
//! calls and never decide whether DNS should change.

use crate::error::Result;
use crate::model::AddressFamily;
use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for public address discovery implementations
///
/// Implementations must fail with `Error::AddressUnavailable` when no
/// qualifying address of the requested family exists, and must bound any
/// network call they make with a timeout.
#[async_trait]
pub trait AddressSource: Send + Sync {
    /// Discover a globally-routable address of the requested family
    async fn discover(&self, family: AddressFamily) -> Result<IpAddr>;

    /// Source name for logging
    fn source_name(&self) -> &'static str;
}
