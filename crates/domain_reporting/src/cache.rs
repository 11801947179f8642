//! Debtor report cache
//!
//! One snapshot of the debtor report lives under a single fixed key as a list
//! of JSON documents, one per debtor. Writes replace the whole list and reset
//! the expiry; expiry itself is enforced by the store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use core_kernel::{DomainPort, HealthCheckable, PortError};
use domain_billing::DebtorReport;

use crate::error::ReportError;

/// Key the debtor snapshot is stored under
pub const DEFAULT_CACHE_KEY: &str = "debtors_cache";

/// How long a written snapshot stays readable
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// List-oriented key-value store with per-key expiry
///
/// Implementations must treat an expired key exactly like a missing one.
#[async_trait]
pub trait CacheStorePort: DomainPort + HealthCheckable {
    /// Removes the key and everything stored under it
    async fn delete(&self, key: &str) -> Result<(), PortError>;

    /// Atomically replaces the list under `key` and sets its expiry
    ///
    /// Readers observe either the previous list or the complete new one.
    /// A `ttl` under one second is rejected with `PortError::Validation`.
    async fn replace(&self, key: &str, values: Vec<String>, ttl: Duration) -> Result<(), PortError>;

    /// Returns every value under `key` in insertion order, or an empty list
    /// if the key is absent or expired
    async fn read_all(&self, key: &str) -> Result<Vec<String>, PortError>;
}

/// Cache key and expiry settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebtorCacheConfig {
    /// Key the snapshot is stored under
    pub key: String,
    /// Expiry applied on every write
    pub ttl: Duration,
}

impl DebtorCacheConfig {
    /// Creates the default configuration (`debtors_cache`, one hour)
    pub fn new() -> Self {
        Self {
            key: DEFAULT_CACHE_KEY.to_string(),
            ttl: DEFAULT_TTL,
        }
    }

    /// Sets the cache key
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Sets the expiry window
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for DebtorCacheConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Time-boxed cache of the current debtor report snapshot
#[derive(Clone)]
pub struct DebtorReportCache {
    store: Arc<dyn CacheStorePort>,
    config: DebtorCacheConfig,
}

impl DebtorReportCache {
    /// Creates a cache over the given store
    ///
    /// # Arguments
    ///
    /// * `store` - Backing key-value store
    /// * `config` - Key and expiry settings
    pub fn new(store: Arc<dyn CacheStorePort>, config: DebtorCacheConfig) -> Self {
        Self { store, config }
    }

    /// Returns the active configuration
    pub fn config(&self) -> &DebtorCacheConfig {
        &self.config
    }

    /// Replaces the cached snapshot
    ///
    /// The previous snapshot is always removed. An empty `reports` slice
    /// stores nothing, so the next [`get`](Self::get) reports a miss.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::CacheUnavailable` if the store rejects the write
    pub async fn put(&self, reports: &[DebtorReport]) -> Result<(), ReportError> {
        if reports.is_empty() {
            debug!(key = %self.config.key, "Empty debtor report, clearing cache without storing");
            return self.invalidate().await;
        }

        let values = reports
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ReportError::CacheUnavailable(PortError::transformation(e.to_string())))?;

        self.store
            .replace(&self.config.key, values, self.config.ttl)
            .await
            .map_err(ReportError::CacheUnavailable)?;

        debug!(
            key = %self.config.key,
            entries = reports.len(),
            ttl_secs = self.config.ttl.as_secs(),
            "Debtor report cached"
        );
        Ok(())
    }

    /// Reads the cached snapshot
    ///
    /// Returns an empty list when nothing is cached or the snapshot expired.
    /// Entries that fail to parse are skipped and logged; the rest of the
    /// snapshot is still returned in order.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::CacheUnavailable` if the store cannot be read
    pub async fn get(&self) -> Result<Vec<DebtorReport>, ReportError> {
        let raw = self
            .store
            .read_all(&self.config.key)
            .await
            .map_err(ReportError::CacheUnavailable)?;

        let mut reports = Vec::with_capacity(raw.len());
        for (index, item) in raw.iter().enumerate() {
            match serde_json::from_str::<DebtorReport>(item) {
                Ok(report) => reports.push(report),
                Err(e) => {
                    let err = ReportError::CorruptCacheEntry {
                        key: self.config.key.clone(),
                        index,
                        reason: e.to_string(),
                    };
                    warn!(error = %err, "Skipping unreadable cache entry");
                }
            }
        }

        Ok(reports)
    }

    /// Removes the snapshot regardless of its expiry state
    ///
    /// # Errors
    ///
    /// Returns `ReportError::CacheUnavailable` if the store rejects the delete
    pub async fn invalidate(&self) -> Result<(), ReportError> {
        self.store
            .delete(&self.config.key)
            .await
            .map_err(ReportError::CacheUnavailable)
    }
}

impl std::fmt::Debug for DebtorReportCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebtorReportCache")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
