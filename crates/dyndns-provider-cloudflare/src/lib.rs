// # Cloudflare DNS Backend
//
// Implements the `DnsBackend` capability trait against the Cloudflare
// API v4. The backend only performs wire calls and error classification;
// all create/update/no-op decisions stay in the reconciler.
//
// - Every request carries the client-level timeout
// - No retries, no backoff, no caching; failures surface immediately
// - The API token never appears in logs or Debug output
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List Zones: GET `/zones?name=...`
// - List DNS Records: GET `/zones/:zone_id/dns_records?name=...&type=...`
// - Create DNS Record: POST `/zones/:zone_id/dns_records`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use dyndns_core::model::{RecordRef, RecordSpec, RecordType, Ttl, ZoneRef};
use dyndns_core::traits::{BackendFactory, Credentials, DnsBackend};
use dyndns_core::{Error, Result};
use serde_json::Value;
use std::time::Duration;

/// Cloudflare API base URL
const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Timeout applied to every API request
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Cloudflare DNS backend bound to one set of request credentials
pub struct CloudflareBackend {
    /// API token, never logged
    api_token: String,

    /// Account email, forwarded as X-Auth-Email when present
    email: Option<String>,

    /// API base URL, overridable for tests
    base_url: String,

    client: reqwest::Client,
}

// Custom Debug that hides the API token
impl std::fmt::Debug for CloudflareBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareBackend")
            .field("api_token", &"<REDACTED>")
            .field("email", &self.email)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CloudflareBackend {
    /// Create a backend for the production API endpoint
    pub fn new(api_token: impl Into<String>, email: Option<String>) -> Result<Self> {
        Self::with_base_url(api_token, email, CLOUDFLARE_API_BASE)
    }

    /// Create a backend against an alternative base URL
    ///
    /// Mainly useful for pointing at a mock server in tests.
    pub fn with_base_url(
        api_token: impl Into<String>,
        email: Option<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::invalid_input("Cloudflare API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_token,
            email,
            base_url: base_url.into(),
            client,
        })
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json");
        if let Some(ref email) = self.email {
            builder = builder.header("X-Auth-Email", email);
        }
        builder
    }

    /// Send a request and return the parsed `result` payload
    async fn execute(&self, builder: reqwest::RequestBuilder, context: &str) -> Result<Value> {
        let response = builder.send().await.map_err(|e| transport_error(e, context))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body, context));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| Error::provider_unavailable(format!("{context}: malformed response: {e}")))?;

        Ok(json["result"].clone())
    }

    fn record_payload(spec: &RecordSpec) -> Value {
        serde_json::json!({
            "type": spec.record_type.as_str(),
            "name": spec.name,
            "content": spec.content.to_string(),
            "ttl": spec.ttl.as_secs(),
            "proxied": spec.proxied,
        })
    }
}

#[async_trait]
impl DnsBackend for CloudflareBackend {
    async fn list_zones(&self, name: &str) -> Result<Vec<ZoneRef>> {
        tracing::debug!(zone = name, "listing zones");

        let url = format!("{}/zones", self.base_url);
        let result = self
            .execute(
                self.request(reqwest::Method::GET, &url).query(&[("name", name)]),
                "zone lookup",
            )
            .await?;

        let zones = result
            .as_array()
            .ok_or_else(|| Error::provider_unavailable("zone lookup: result is not an array"))?;

        zones
            .iter()
            .map(|zone| {
                Ok(ZoneRef {
                    id: field_str(zone, "id", "zone")?.to_string(),
                    name: field_str(zone, "name", "zone")?.to_string(),
                })
            })
            .collect()
    }

    async fn list_records(
        &self,
        zone_id: &str,
        name: Option<&str>,
        record_type: Option<RecordType>,
    ) -> Result<Vec<RecordRef>> {
        tracing::debug!(zone_id, ?name, ?record_type, "listing records");

        let url = format!("{}/zones/{}/dns_records", self.base_url, zone_id);
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(name) = name {
            query.push(("name", name.to_string()));
        }
        if let Some(record_type) = record_type {
            query.push(("type", record_type.as_str().to_string()));
        }

        let result = self
            .execute(
                self.request(reqwest::Method::GET, &url).query(&query),
                "record lookup",
            )
            .await?;

        let records = result
            .as_array()
            .ok_or_else(|| Error::provider_unavailable("record lookup: result is not an array"))?;

        // Records of types we don't handle (TXT, MX, ...) can show up when
        // the type filter is absent; skip them instead of failing.
        records
            .iter()
            .filter(|r| {
                r["type"]
                    .as_str()
                    .is_some_and(|t| t == "A" || t == "AAAA")
            })
            .map(parse_record)
            .collect()
    }

    async fn create_record(&self, zone_id: &str, spec: &RecordSpec) -> Result<RecordRef> {
        tracing::info!(
            zone_id,
            record = %spec.name,
            record_type = %spec.record_type,
            content = %spec.content,
            "creating record"
        );

        let url = format!("{}/zones/{}/dns_records", self.base_url, zone_id);
        let result = self
            .execute(
                self.request(reqwest::Method::POST, &url)
                    .json(&Self::record_payload(spec)),
                "record create",
            )
            .await?;

        parse_record(&result)
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        spec: &RecordSpec,
    ) -> Result<RecordRef> {
        tracing::info!(
            zone_id,
            record_id,
            record = %spec.name,
            content = %spec.content,
            "updating record"
        );

        let url = format!(
            "{}/zones/{}/dns_records/{}",
            self.base_url, zone_id, record_id
        );
        let result = self
            .execute(
                self.request(reqwest::Method::PUT, &url)
                    .json(&Self::record_payload(spec)),
                "record update",
            )
            .await?;

        parse_record(&result)
    }

    fn backend_name(&self) -> &'static str {
        "cloudflare"
    }
}

/// Classify a reqwest transport error
fn transport_error(err: reqwest::Error, context: &str) -> Error {
    if err.is_timeout() {
        Error::provider_unavailable(format!("{context}: request timed out"))
    } else {
        Error::provider_unavailable(format!("{context}: {err}"))
    }
}

/// Map an HTTP error status to the error taxonomy
fn status_error(status: reqwest::StatusCode, body: &str, context: &str) -> Error {
    match status.as_u16() {
        401 | 403 => Error::unauthorized(format!(
            "{context}: invalid API token or insufficient permissions ({status})"
        )),
        404 => Error::record_not_found(format!("{context}: {status}")),
        429 => Error::provider_unavailable(format!("{context}: rate limited ({status})")),
        500..=599 => {
            Error::provider_unavailable(format!("{context}: server error {status}: {body}"))
        }
        _ => Error::internal(format!("{context}: unexpected status {status}: {body}")),
    }
}

fn field_str<'a>(value: &'a Value, field: &str, context: &str) -> Result<&'a str> {
    value[field].as_str().ok_or_else(|| {
        Error::provider_unavailable(format!("{context}.{field} is not a string"))
    })
}

/// Parse one DNS record object from a Cloudflare response
fn parse_record(value: &Value) -> Result<RecordRef> {
    let record_type: RecordType = field_str(value, "type", "record")?.parse()?;
    let content = field_str(value, "content", "record")?
        .parse()
        .map_err(|_| Error::provider_unavailable("record.content is not an IP address"))?;
    let ttl = value["ttl"]
        .as_u64()
        .map(|t| Ttl::from_secs(t as u32))
        .unwrap_or(Ttl::Automatic);

    Ok(RecordRef {
        id: field_str(value, "id", "record")?.to_string(),
        name: field_str(value, "name", "record")?.to_string(),
        record_type,
        content,
        ttl,
        proxied: value["proxied"].as_bool().unwrap_or(false),
    })
}

/// Factory for creating Cloudflare backends from per-request credentials
pub struct CloudflareFactory;

impl BackendFactory for CloudflareFactory {
    fn create(&self, credentials: &Credentials) -> Result<Box<dyn DnsBackend>> {
        if credentials.token.is_empty() {
            return Err(Error::invalid_input("Cloudflare API token is required"));
        }

        Ok(Box::new(CloudflareBackend::new(
            credentials.token.clone(),
            credentials.email.clone(),
        )?))
    }
}
