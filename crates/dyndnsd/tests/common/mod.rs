//! Test doubles for HTTP contract tests
//!
//! A fake provider account shared across the backends the factory hands
//! out, so one test can issue several requests and watch mutations
//! accumulate (or not).

use dyndns_core::error::{Error, Result};
use dyndns_core::model::{AddressFamily, RecordRef, RecordSpec, RecordType, ZoneRef};
use dyndns_core::traits::{AddressSource, BackendFactory, Credentials, DnsBackend};
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Shared fake provider account state
pub struct FakeAccount {
    zones: Mutex<Vec<ZoneRef>>,
    records: Mutex<Vec<(String, RecordRef)>>,
    next_id: AtomicUsize,
    mutation_calls: AtomicUsize,
    last_credentials: Mutex<Option<Credentials>>,
    reject_auth: AtomicUsize,
}

#[allow(dead_code)]
impl FakeAccount {
    pub fn with_zone(zone_name: &str) -> Arc<Self> {
        Arc::new(Self {
            zones: Mutex::new(vec![ZoneRef {
                id: format!("zone-{zone_name}"),
                name: zone_name.to_string(),
            }]),
            records: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
            mutation_calls: AtomicUsize::new(0),
            last_credentials: Mutex::new(None),
            reject_auth: AtomicUsize::new(0),
        })
    }

    pub fn without_zones() -> Arc<Self> {
        let account = Self::with_zone("placeholder");
        account.zones.lock().unwrap().clear();
        account
    }

    /// Make every backend call fail with Unauthorized
    pub fn reject_auth(&self) {
        self.reject_auth.store(1, Ordering::SeqCst);
    }

    pub fn mutation_calls(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }

    pub fn last_credentials(&self) -> Option<Credentials> {
        self.last_credentials.lock().unwrap().clone()
    }

    pub fn records(&self) -> Vec<RecordRef> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|(_, r)| r.clone())
            .collect()
    }

    fn check_auth(&self) -> Result<()> {
        if self.reject_auth.load(Ordering::SeqCst) != 0 {
            Err(Error::unauthorized("invalid API token"))
        } else {
            Ok(())
        }
    }
}

/// Backend view over the shared account
pub struct FakeBackend {
    account: Arc<FakeAccount>,
}

#[async_trait::async_trait]
impl DnsBackend for FakeBackend {
    async fn list_zones(&self, name: &str) -> Result<Vec<ZoneRef>> {
        self.account.check_auth()?;
        Ok(self
            .account
            .zones
            .lock()
            .unwrap()
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
        self.account.check_auth()?;
        Ok(self
            .account
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
        self.account.check_auth()?;
        self.account.mutation_calls.fetch_add(1, Ordering::SeqCst);

        let record = RecordRef {
            id: format!("rec-{}", self.account.next_id.fetch_add(1, Ordering::SeqCst)),
            name: spec.name.clone(),
            record_type: spec.record_type,
            content: spec.content,
            ttl: spec.ttl,
            proxied: spec.proxied,
        };
        self.account
            .records
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
        self.account.check_auth()?;
        self.account.mutation_calls.fetch_add(1, Ordering::SeqCst);

        let mut records = self.account.records.lock().unwrap();
        let (_, record) = records
            .iter_mut()
            .find(|(zid, r)| zid == zone_id && r.id == record_id)
            .ok_or_else(|| Error::record_not_found(record_id))?;
        record.content = spec.content;
        record.ttl = spec.ttl;
        record.proxied = spec.proxied;
        Ok(record.clone())
    }

    fn backend_name(&self) -> &'static str {
        "fake"
    }
}

/// Factory handing out backends over one shared account
pub struct FakeFactory {
    pub account: Arc<FakeAccount>,
}

impl BackendFactory for FakeFactory {
    fn create(&self, credentials: &Credentials) -> Result<Box<dyn DnsBackend>> {
        *self.account.last_credentials.lock().unwrap() = Some(credentials.clone());
        Ok(Box::new(FakeBackend {
            account: Arc::clone(&self.account),
        }))
    }
}

/// Address source returning a fixed address, or failing when empty
pub struct FakeAddressSource {
    ip: Option<IpAddr>,
    pub discover_calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeAddressSource {
    pub fn returning(ip: &str) -> Self {
        Self {
            ip: Some(ip.parse().unwrap()),
            discover_calls: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            ip: None,
            discover_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl AddressSource for FakeAddressSource {
    async fn discover(&self, family: AddressFamily) -> Result<IpAddr> {
        self.discover_calls.fetch_add(1, Ordering::SeqCst);
        match self.ip {
            Some(ip) if family.matches(ip) => Ok(ip),
            _ => Err(Error::address_unavailable("no qualifying address")),
        }
    }

    fn source_name(&self) -> &'static str {
        "fake"
    }
}
