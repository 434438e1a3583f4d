//! Core reconciliation engine
//!
//! One pass converges the provider's view of a single (name, type) record
//! onto a [`DesiredState`]:
//!
//! 1. Validate input (fail fast, zero side effects)
//! 2. Locate the zone
//! 3. Locate the record (absence is an ordinary outcome, not an error)
//! 4. Decide: create / update / leave untouched
//! 5. Perform at most one mutating provider call
//!
//! The flow is strictly linear with no internal retries; a failed
//! provider call surfaces immediately and retry policy stays with the
//! external caller. At-most-one mutation keeps repeated invocations
//! naturally idempotent, which matters because callers (routers, cron
//! jobs) hit the endpoint on a fixed interval whether or not the address
//! changed.

use crate::error::{Error, Result};
use crate::model::{DesiredState, RecordRef, RecordSpec, RecordType, ReconcileOutcome, Ttl, ZoneRef};
use crate::traits::DnsBackend;
use tracing::{debug, info};

/// Reconciles desired record state against a DNS backend
///
/// Borrows the backend for the duration of one request; holds no state
/// of its own and caches nothing across invocations.
pub struct Reconciler<'a> {
    backend: &'a dyn DnsBackend,
}

impl<'a> Reconciler<'a> {
    pub fn new(backend: &'a dyn DnsBackend) -> Self {
        Self { backend }
    }

    /// Run one reconciliation pass
    pub async fn reconcile(&self, desired: &DesiredState) -> Result<ReconcileOutcome> {
        validate_desired(desired)?;

        let zone = self.resolve_zone(&desired.zone).await?;
        let existing = self
            .find_record(&zone, &desired.record_name, desired.record_type)
            .await?;

        match existing {
            None => {
                debug!(
                    record = %desired.record_name,
                    record_type = %desired.record_type,
                    "no existing record, creating"
                );
                self.create(&zone, desired).await
            }
            Some(record) if record.content == desired.content => {
                debug!(
                    record = %record.name,
                    content = %record.content,
                    "record already current"
                );
                Ok(ReconcileOutcome::Unchanged(record))
            }
            Some(record) => {
                debug!(
                    record = %record.name,
                    old = %record.content,
                    new = %desired.content,
                    "record stale, updating"
                );
                self.update(&zone, &record, desired).await
            }
        }
    }

    /// Resolve a zone name to the provider's zone identifier
    ///
    /// Providers guarantee zone name uniqueness per account scope; should
    /// that ever be violated, the first zone in provider list order wins.
    /// That tie-break is documented behavior, not an error.
    pub async fn resolve_zone(&self, name: &str) -> Result<ZoneRef> {
        let zones = self.backend.list_zones(name).await?;

        zones
            .into_iter()
            .next()
            .ok_or_else(|| Error::zone_not_found(name))
    }

    /// Find zero-or-one record of (name, type) within a zone
    ///
    /// `None` is the expected "needs creation" case. When duplicates
    /// share (name, type) the first in provider list order is chosen;
    /// callers may rely on exactly one being chosen, not on which.
    pub async fn find_record(
        &self,
        zone: &ZoneRef,
        name: &str,
        record_type: RecordType,
    ) -> Result<Option<RecordRef>> {
        let records = self
            .backend
            .list_records(&zone.id, Some(name), Some(record_type))
            .await?;

        // Re-filter client-side; backends without server-side filtering
        // return the whole zone.
        Ok(records
            .into_iter()
            .find(|r| r.name == name && r.record_type == record_type))
    }

    async fn create(&self, zone: &ZoneRef, desired: &DesiredState) -> Result<ReconcileOutcome> {
        let spec = RecordSpec {
            name: desired.record_name.clone(),
            record_type: desired.record_type,
            content: desired.content,
            ttl: Ttl::Automatic,
            proxied: false,
        };

        let created = self.backend.create_record(&zone.id, &spec).await?;
        info!(
            backend = self.backend.backend_name(),
            record = %created.name,
            content = %created.content,
            "record created"
        );
        Ok(ReconcileOutcome::Created(created))
    }

    async fn update(
        &self,
        zone: &ZoneRef,
        existing: &RecordRef,
        desired: &DesiredState,
    ) -> Result<ReconcileOutcome> {
        // Only the content changes; ttl and proxied carry over.
        let spec = RecordSpec {
            name: desired.record_name.clone(),
            record_type: desired.record_type,
            content: desired.content,
            ttl: existing.ttl,
            proxied: existing.proxied,
        };

        let updated = self
            .backend
            .update_record(&zone.id, &existing.id, &spec)
            .await?;
        info!(
            backend = self.backend.backend_name(),
            record = %updated.name,
            old = %existing.content,
            new = %updated.content,
            "record updated"
        );
        Ok(ReconcileOutcome::Updated(updated))
    }
}

/// Validate a desired state before any outbound call
fn validate_desired(desired: &DesiredState) -> Result<()> {
    validate_domain_name(&desired.zone)
        .map_err(|e| Error::invalid_input(format!("zone: {e}")))?;
    validate_domain_name(&desired.record_name)
        .map_err(|e| Error::invalid_input(format!("record: {e}")))?;
    Ok(())
}

/// Basic RFC 1035 domain name validation
///
/// Not comprehensive, but it catches the common caller mistakes before
/// they turn into provider round trips.
pub fn validate_domain_name(domain: &str) -> std::result::Result<(), String> {
    if domain.is_empty() {
        return Err("name cannot be empty".to_string());
    }

    if domain.len() > 253 {
        return Err(format!("name too long: {} chars (max 253)", domain.len()));
    }

    for label in domain.split('.') {
        if label.is_empty() {
            return Err(format!("name has empty label: '{domain}'"));
        }

        if label.len() > 63 {
            return Err(format!("label too long: '{label}' (max 63 chars)"));
        }

        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(format!("label contains invalid characters: '{label}'"));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(format!("label cannot start or end with hyphen: '{label}'"));
        }
    }

    Ok(())
}
