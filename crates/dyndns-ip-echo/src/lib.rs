// # IP-Echo Address Source
//
// Alternative discovery strategy: ask an external echo service what
// address our requests originate from. Useful behind NAT, where no local
// interface carries the public address.
//
// Every request has a bounded timeout; a non-2xx status or a body that
// doesn't parse as an address of the requested family surfaces as
// `AddressUnavailable`.

use async_trait::async_trait;
use dyndns_core::model::AddressFamily;
use dyndns_core::traits::AddressSource;
use dyndns_core::{Error, Result};
use std::net::IpAddr;
use std::time::Duration;

/// Timeout for echo service requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Default echo endpoints per family (ipify returns a plain-text address)
const DEFAULT_URL_V4: &str = "https://api.ipify.org";
const DEFAULT_URL_V6: &str = "https://api64.ipify.org";

/// Address source backed by an external IP-echo service
pub struct EchoAddressSource {
    url_v4: String,
    url_v6: String,
    client: reqwest::Client,
}

impl EchoAddressSource {
    /// Create a source against the default ipify endpoints
    pub fn new() -> Result<Self> {
        Self::with_urls(DEFAULT_URL_V4, DEFAULT_URL_V6)
    }

    /// Create a source with explicit per-family endpoints
    ///
    /// Mainly useful for pointing at a mock server in tests.
    pub fn with_urls(url_v4: impl Into<String>, url_v6: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url_v4: url_v4.into(),
            url_v6: url_v6.into(),
            client,
        })
    }

    fn url_for(&self, family: AddressFamily) -> &str {
        match family {
            AddressFamily::V4 => &self.url_v4,
            AddressFamily::V6 => &self.url_v6,
        }
    }
}

#[async_trait]
impl AddressSource for EchoAddressSource {
    async fn discover(&self, family: AddressFamily) -> Result<IpAddr> {
        let url = self.url_for(family);

        let response = self.client.get(url).send().await.map_err(|e| {
            Error::address_unavailable(format!("echo request failed: {e}"))
        })?;

        if !response.status().is_success() {
            return Err(Error::address_unavailable(format!(
                "echo service returned {}",
                response.status()
            )));
        }

        let body = response.text().await.map_err(|e| {
            Error::address_unavailable(format!("failed to read echo response: {e}"))
        })?;

        let ip: IpAddr = body.trim().parse().map_err(|_| {
            Error::address_unavailable(format!("echo body is not an IP address: {body:.64}"))
        })?;

        if !family.matches(ip) {
            return Err(Error::address_unavailable(format!(
                "echo returned {ip}, wanted {family}"
            )));
        }

        tracing::debug!(address = %ip, %family, "discovered echoed address");
        Ok(ip)
    }

    fn source_name(&self) -> &'static str {
        "echo"
    }
}
