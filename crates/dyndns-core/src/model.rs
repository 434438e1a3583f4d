//! Request-scoped value objects for one reconciliation pass
//!
//! The provider's zone and record store is the system of record; nothing
//! here outlives a single `reconcile()` call and nothing is cached across
//! invocations.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Address family the caller wants published
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    /// The record type an address of this family is published as
    pub fn record_type(self) -> RecordType {
        match self {
            AddressFamily::V4 => RecordType::A,
            AddressFamily::V6 => RecordType::Aaaa,
        }
    }

    /// True if `ip` belongs to this family
    pub fn matches(self, ip: IpAddr) -> bool {
        match self {
            AddressFamily::V4 => ip.is_ipv4(),
            AddressFamily::V6 => ip.is_ipv6(),
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::V4 => write!(f, "IPv4"),
            AddressFamily::V6 => write!(f, "IPv6"),
        }
    }
}

/// DNS resource record type handled by the reconciler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    #[serde(rename = "A")]
    A,
    #[serde(rename = "AAAA")]
    Aaaa,
}

impl RecordType {
    /// Record type matching the family of `ip`
    pub fn for_ip(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => RecordType::A,
            IpAddr::V6(_) => RecordType::Aaaa,
        }
    }

    /// Wire name of the record type
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            other => Err(Error::invalid_input(format!(
                "unsupported record type: {other}"
            ))),
        }
    }
}

/// Time-to-live for a record
///
/// Providers commonly expose an "automatic" sentinel next to explicit
/// second counts; Cloudflare encodes it as `1` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    Automatic,
    Secs(u32),
}

impl Ttl {
    /// Decode from the provider's integer encoding (1 = automatic)
    pub fn from_secs(secs: u32) -> Self {
        if secs == 1 {
            Ttl::Automatic
        } else {
            Ttl::Secs(secs)
        }
    }

    /// Encode to the provider's integer encoding
    pub fn as_secs(self) -> u32 {
        match self {
            Ttl::Automatic => 1,
            Ttl::Secs(secs) => secs,
        }
    }
}

/// A zone resolved against the provider account
///
/// The `id` is only ever obtained from a successful zone lookup; it is
/// never fabricated or carried over from a previous request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRef {
    /// Opaque provider identifier
    pub id: String,
    /// Fully-qualified zone name (e.g. "example.com")
    pub name: String,
}

/// The provider's view of one DNS resource record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRef {
    /// Opaque provider identifier
    pub id: String,
    /// Fully-qualified record name
    pub name: String,
    /// Record type (A or AAAA)
    pub record_type: RecordType,
    /// Address the record currently points at
    pub content: IpAddr,
    /// Time-to-live
    pub ttl: Ttl,
    /// Whether the provider proxies traffic for this record
    pub proxied: bool,
}

/// Fields sent to the provider when creating or updating a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSpec {
    pub name: String,
    pub record_type: RecordType,
    pub content: IpAddr,
    pub ttl: Ttl,
    pub proxied: bool,
}

/// The state one reconciliation pass should converge the provider to
///
/// Built fresh per request from caller input and/or a discovered address;
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredState {
    /// Zone name used for provider lookup
    pub zone: String,
    /// Fully-qualified record name (zone apex when no label was given)
    pub record_name: String,
    /// Record type, derived from the address family
    pub record_type: RecordType,
    /// Address to publish
    pub content: IpAddr,
}

impl DesiredState {
    /// Build a desired state for `zone`, publishing `content`
    ///
    /// `label` is an optional subdomain label; `None` targets the zone
    /// apex. A label that already ends with the zone name is taken as
    /// fully qualified.
    pub fn new(zone: impl Into<String>, label: Option<&str>, content: IpAddr) -> Self {
        let zone = zone.into();
        let record_name = match label {
            None | Some("") => zone.clone(),
            Some(label) if label == zone || label.ends_with(&format!(".{zone}")) => {
                label.to_string()
            }
            Some(label) => format!("{label}.{zone}"),
        };

        Self {
            zone,
            record_name,
            record_type: RecordType::for_ip(content),
            content,
        }
    }
}

/// Terminal outcome of a successful reconciliation pass
///
/// Failures travel through `Err(Error)` instead of a dedicated variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// No record matched (name, type); one was created
    Created(RecordRef),
    /// A record existed with stale content; it was rewritten in place
    Updated(RecordRef),
    /// The existing record already carried the desired content
    Unchanged(RecordRef),
}

impl ReconcileOutcome {
    /// The record the pass converged on
    pub fn record(&self) -> &RecordRef {
        match self {
            ReconcileOutcome::Created(r)
            | ReconcileOutcome::Updated(r)
            | ReconcileOutcome::Unchanged(r) => r,
        }
    }

    /// True if the pass issued a mutating provider call
    pub fn mutated(&self) -> bool {
        !matches!(self, ReconcileOutcome::Unchanged(_))
    }
}
