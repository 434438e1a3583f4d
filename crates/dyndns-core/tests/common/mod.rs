//! Test doubles for reconciler contract tests
//!
//! An in-memory DNS backend that behaves like a provider account: zones
//! are fixed at construction, records live in a shared table, and every
//! call type is counted so tests can assert on side-effect budgets.

use dyndns_core::error::{Error, Result};
use dyndns_core::model::{RecordRef, RecordSpec, RecordType, Ttl, ZoneRef};
use dyndns_core::traits::DnsBackend;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Which backend call the next injected failure hits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum FailOn {
    ListZones,
    ListRecords,
    Create,
    Update,
}

/// What the injected failure looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum FailKind {
    Unauthorized,
    Unavailable,
}

/// In-memory DNS backend with call counters
pub struct InMemoryBackend {
    zones: Vec<ZoneRef>,
    records: Arc<Mutex<Vec<(String, RecordRef)>>>,
    next_id: AtomicUsize,
    list_zones_calls: AtomicUsize,
    list_records_calls: AtomicUsize,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
    failure: Mutex<Option<(FailOn, FailKind)>>,
}

#[allow(dead_code)]
impl InMemoryBackend {
    /// Backend holding a single zone named `zone_name`
    pub fn with_zone(zone_name: &str) -> Self {
        Self {
            zones: vec![ZoneRef {
                id: format!("zone-{zone_name}"),
                name: zone_name.to_string(),
            }],
            records: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicUsize::new(1),
            list_zones_calls: AtomicUsize::new(0),
            list_records_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            failure: Mutex::new(None),
        }
    }

    /// Backend with no zones at all
    pub fn empty() -> Self {
        let mut backend = Self::with_zone("placeholder");
        backend.zones.clear();
        backend
    }

    /// Seed a record into the named zone, returning its id
    pub fn seed_record(&self, zone_name: &str, record: RecordRef) -> String {
        let zone = self
            .zones
            .iter()
            .find(|z| z.name == zone_name)
            .expect("seed into known zone");
        let id = record.id.clone();
        self.records
            .lock()
            .unwrap()
            .push((zone.id.clone(), record));
        id
    }

    /// Make one category of call fail from now on
    pub fn fail(&self, on: FailOn, kind: FailKind) {
        *self.failure.lock().unwrap() = Some((on, kind));
    }

    pub fn list_zones_calls(&self) -> usize {
        self.list_zones_calls.load(Ordering::SeqCst)
    }

    pub fn list_records_calls(&self) -> usize {
        self.list_records_calls.load(Ordering::SeqCst)
    }

    /// Total mutating calls issued (create + update)
    pub fn mutation_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst) + self.update_calls.load(Ordering::SeqCst)
    }

    /// Snapshot of all records in the named zone
    pub fn records_in(&self, zone_name: &str) -> Vec<RecordRef> {
        let zone_id = self
            .zones
            .iter()
            .find(|z| z.name == zone_name)
            .map(|z| z.id.clone())
            .unwrap_or_default();
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|(zid, _)| *zid == zone_id)
            .map(|(_, r)| r.clone())
            .collect()
    }

    fn check_failure(&self, call: FailOn) -> Result<()> {
        if let Some((on, kind)) = *self.failure.lock().unwrap()
            && on == call
        {
            return Err(match kind {
                FailKind::Unauthorized => Error::unauthorized("injected auth failure"),
                FailKind::Unavailable => Error::provider_unavailable("injected outage"),
            });
        }
        Ok(())
    }

    fn allocate_id(&self) -> String {
        format!("rec-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait::async_trait]
impl DnsBackend for InMemoryBackend {
    async fn list_zones(&self, name: &str) -> Result<Vec<ZoneRef>> {
        self.list_zones_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure(FailOn::ListZones)?;
        Ok(self
            .zones
            .iter()
            .filter(|z| z.name == name)
            .cloned()
            .collect())
    }

    async fn list_records(
        &self,
        zone_id: &str,
        name: Option<&str>,
        record_type: Option<RecordType>,
    ) -> Result<Vec<RecordRef>> {
        self.list_records_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure(FailOn::ListRecords)?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|(zid, r)| {
                *zid == zone_id
                    && name.is_none_or(|n| r.name == n)
                    && record_type.is_none_or(|t| r.record_type == t)
            })
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn create_record(&self, zone_id: &str, spec: &RecordSpec) -> Result<RecordRef> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure(FailOn::Create)?;

        let record = RecordRef {
            id: self.allocate_id(),
            name: spec.name.clone(),
            record_type: spec.record_type,
            content: spec.content,
            ttl: spec.ttl,
            proxied: spec.proxied,
        };
        self.records
            .lock()
            .unwrap()
            .push((zone_id.to_string(), record.clone()));
        Ok(record)
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        spec: &RecordSpec,
    ) -> Result<RecordRef> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure(FailOn::Update)?;

        let mut records = self.records.lock().unwrap();
        let (_, record) = records
            .iter_mut()
            .find(|(zid, r)| zid == zone_id && r.id == record_id)
            .ok_or_else(|| Error::record_not_found(record_id))?;

        record.name = spec.name.clone();
        record.record_type = spec.record_type;
        record.content = spec.content;
        record.ttl = spec.ttl;
        record.proxied = spec.proxied;
        Ok(record.clone())
    }

    fn backend_name(&self) -> &'static str {
        "in-memory"
    }
}

/// Convenience record constructor for seeding
#[allow(dead_code)]
pub fn record(id: &str, name: &str, record_type: RecordType, content: &str) -> RecordRef {
    RecordRef {
        id: id.to_string(),
        name: name.to_string(),
        record_type,
        content: content.parse().expect("valid test address"),
        ttl: Ttl::Automatic,
        proxied: false,
    }
}
