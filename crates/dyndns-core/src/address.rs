//! Address resolution: explicit caller input or discovery
//!
//! The caller may hand us the address to publish; if it does, we only
//! validate it. Discovery runs when no explicit address was supplied.

use crate::error::{Error, Result};
use crate::model::AddressFamily;
use crate::traits::AddressSource;
use std::net::IpAddr;

/// Resolve the address to publish for the requested family
///
/// A non-empty `explicit` value must parse as an address of `family` and
/// is returned unchanged (modulo canonical formatting); a parse failure
/// or family mismatch is `InvalidInput`, reported before any discovery
/// side effects. With no explicit value the `source` is consulted.
pub async fn resolve_address(
    explicit: Option<&str>,
    family: AddressFamily,
    source: &dyn AddressSource,
) -> Result<IpAddr> {
    match explicit {
        Some(raw) if !raw.is_empty() => {
            let ip: IpAddr = raw
                .parse()
                .map_err(|_| Error::invalid_input(format!("not a valid IP address: {raw}")))?;

            if !family.matches(ip) {
                return Err(Error::invalid_input(format!(
                    "address {ip} is not {family}"
                )));
            }

            Ok(ip)
        }
        _ => {
            tracing::debug!(source = source.source_name(), %family, "discovering address");
            source.discover(family).await
        }
    }
}
