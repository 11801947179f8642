//! In-memory cache store
//!
//! Keeps lists in a process-local map and evaluates expiry against an
//! injected [`Clock`] at read time. There is no background eviction: an
//! expired entry is dropped the next time it is touched.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{Clock, DomainPort, HealthCheckResult, HealthCheckable, PortError, SystemClock};

use crate::cache::CacheStorePort;

const ADAPTER_ID: &str = "memory-cache-store";

#[derive(Debug, Clone)]
struct StoredList {
    values: Vec<String>,
    expires_at: DateTime<Utc>,
}

/// Process-local [`CacheStorePort`] implementation
#[derive(Debug, Clone)]
pub struct InMemoryCacheStore {
    clock: Arc<dyn Clock>,
    entries: Arc<Mutex<HashMap<String, StoredList>>>,
    available: Arc<AtomicBool>,
}

impl InMemoryCacheStore {
    /// Creates a store driven by the given clock
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            entries: Arc::new(Mutex::new(HashMap::new())),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Creates a store driven by the system clock
    pub fn with_system_clock() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// Simulates the store going down (`false`) or coming back (`true`)
    ///
    /// While unavailable every operation fails with
    /// `PortError::ServiceUnavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Returns true if a live (unexpired) entry exists under `key`
    pub fn contains_key(&self, key: &str) -> bool {
        let now = self.clock.now();
        self.lock()
            .get(key)
            .is_some_and(|entry| entry.expires_at > now)
    }

    fn ensure_available(&self) -> Result<(), PortError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(PortError::ServiceUnavailable {
                service: ADAPTER_ID.to_string(),
            })
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, StoredList>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for InMemoryCacheStore {
    fn default() -> Self {
        Self::with_system_clock()
    }
}

impl DomainPort for InMemoryCacheStore {}

#[async_trait]
impl HealthCheckable for InMemoryCacheStore {
    async fn health_check(&self) -> HealthCheckResult {
        match self.ensure_available() {
            Ok(()) => HealthCheckResult::healthy(ADAPTER_ID, 0),
            Err(e) => HealthCheckResult::unhealthy(ADAPTER_ID, 0, e.to_string()),
        }
    }
}

#[async_trait]
impl CacheStorePort for InMemoryCacheStore {
    async fn delete(&self, key: &str) -> Result<(), PortError> {
        self.ensure_available()?;
        self.lock().remove(key);
        Ok(())
    }

    async fn replace(&self, key: &str, values: Vec<String>, ttl: Duration) -> Result<(), PortError> {
        self.ensure_available()?;
        if ttl.as_secs() == 0 {
            return Err(PortError::validation(format!(
                "TTL must be at least one second, got {}ms",
                ttl.as_millis()
            )));
        }
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| PortError::validation(format!("TTL out of range: {}", e)))?;
        let expires_at = self.clock.now() + ttl;

        let mut entries = self.lock();
        if values.is_empty() {
            entries.remove(key);
        } else {
            entries.insert(key.to_string(), StoredList { values, expires_at });
        }
        Ok(())
    }

    async fn read_all(&self, key: &str) -> Result<Vec<String>, PortError> {
        self.ensure_available()?;
        let now = self.clock.now();

        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Ok(entry.values.clone()),
            Some(_) => {
                entries.remove(key);
                Ok(Vec::new())
            }
            None => Ok(Vec::new()),
        }
    }
}
