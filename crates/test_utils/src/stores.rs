//! In-memory Billing Store
//!
//! A `BillingStorePort` backed by a vector of records. It counts queries so
//! tests can assert how often the orchestrator went to the source, and it can
//! be switched offline to simulate an unreachable database.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use core_kernel::{Clock, DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_billing::{BillingRecord, BillingStorePort};

const ADAPTER_ID: &str = "memory-billing-store";

/// In-memory [`BillingStorePort`] filtered against an injected clock
#[derive(Debug, Clone)]
pub struct InMemoryBillingStore {
    clock: Arc<dyn Clock>,
    records: Arc<Mutex<Vec<BillingRecord>>>,
    queries: Arc<AtomicUsize>,
    available: Arc<AtomicBool>,
}

impl InMemoryBillingStore {
    /// Creates an empty store
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            records: Arc::new(Mutex::new(Vec::new())),
            queries: Arc::new(AtomicUsize::new(0)),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Creates a store seeded with records
    pub fn with_records(clock: Arc<dyn Clock>, records: Vec<BillingRecord>) -> Self {
        let store = Self::new(clock);
        store.replace_all(records);
        store
    }

    /// Adds a record
    pub fn insert(&self, record: BillingRecord) {
        self.records.lock().unwrap().push(record);
    }

    /// Replaces every record
    pub fn replace_all(&self, records: Vec<BillingRecord>) {
        *self.records.lock().unwrap() = records;
    }

    /// Number of `list_overdue_active` calls made so far, failed ones included
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Simulates the store going offline (`false`) or recovering (`true`)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

impl DomainPort for InMemoryBillingStore {}

#[async_trait]
impl HealthCheckable for InMemoryBillingStore {
    async fn health_check(&self) -> HealthCheckResult {
        if self.available.load(Ordering::SeqCst) {
            HealthCheckResult::healthy(ADAPTER_ID, 0)
        } else {
            HealthCheckResult::unhealthy(ADAPTER_ID, 0, "billing store offline")
        }
    }
}

#[async_trait]
impl BillingStorePort for InMemoryBillingStore {
    async fn list_overdue_active(&self) -> Result<Vec<BillingRecord>, PortError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if !self.available.load(Ordering::SeqCst) {
            return Err(PortError::connection("billing store offline"));
        }

        let today = self.clock.today();
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.is_debt_eligible(today))
            .cloned()
            .collect())
    }
}
