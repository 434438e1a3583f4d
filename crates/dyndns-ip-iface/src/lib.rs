// # Interface Address Source
//
// Discovers the machine's public address by enumerating local network
// interface addresses and selecting a globally-routable one. This is the
// default discovery path: it needs no third-party call, just a local
// system query.
//
// Loopback, link-local, unique-local and private-range addresses are
// excluded; the first qualifying address in enumeration order wins.

use async_trait::async_trait;
use dyndns_core::model::AddressFamily;
use dyndns_core::traits::AddressSource;
use dyndns_core::{Error, Result};
use std::net::IpAddr;

/// Address source backed by local interface enumeration
pub struct IfaceAddressSource {
    /// Restrict discovery to one interface by name
    interface: Option<String>,
}

impl IfaceAddressSource {
    pub fn new(interface: Option<String>) -> Self {
        Self { interface }
    }

    fn candidates(&self, family: AddressFamily) -> Result<Vec<IpAddr>> {
        let addrs = if_addrs::get_if_addrs()
            .map_err(|e| Error::internal(format!("interface enumeration failed: {e}")))?;

        Ok(addrs
            .into_iter()
            .filter(|iface| {
                self.interface
                    .as_deref()
                    .is_none_or(|name| iface.name == name)
            })
            .map(|iface| iface.ip())
            .filter(|ip| family.matches(*ip))
            .collect())
    }
}

#[async_trait]
impl AddressSource for IfaceAddressSource {
    async fn discover(&self, family: AddressFamily) -> Result<IpAddr> {
        let candidates = self.candidates(family)?;

        let chosen = select_global(&candidates).ok_or_else(|| {
            Error::address_unavailable(format!(
                "no globally-routable {family} address on local interfaces"
            ))
        })?;

        tracing::debug!(address = %chosen, %family, "discovered interface address");
        Ok(chosen)
    }

    fn source_name(&self) -> &'static str {
        "iface"
    }
}

/// Pick the first globally-routable address in enumeration order
pub fn select_global(candidates: &[IpAddr]) -> Option<IpAddr> {
    candidates.iter().copied().find(|ip| is_global(*ip))
}

/// True for addresses worth publishing in public DNS
///
/// Excludes loopback, unspecified, link-local, and the non-routable
/// scopes of each family: RFC 1918 private and CGNAT ranges for v4,
/// unique-local (fc00::/7) and v4-mapped for v6.
pub fn is_global(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_loopback()
                || v4.is_unspecified()
                || v4.is_link_local()
                || v4.is_private()
                || v4.is_broadcast()
                || v4.is_documentation()
                // CGNAT 100.64.0.0/10
                || (v4.octets()[0] == 100 && (v4.octets()[1] & 0xc0) == 64))
        }
        IpAddr::V6(v6) => {
            let seg0 = v6.segments()[0];
            !(v6.is_loopback()
                || v6.is_unspecified()
                || v6.to_ipv4_mapped().is_some()
                // link-local fe80::/10
                || (seg0 & 0xffc0) == 0xfe80
                // unique-local fc00::/7
                || (seg0 & 0xfe00) == 0xfc00)
        }
    }
}
