//! Debtor report orchestration
//!
//! Serves the debtor report from cache when possible and rebuilds it from
//! the billing store otherwise.

use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use core_kernel::Clock;
use domain_billing::{debt, BillingStorePort, DebtorReport};

use crate::cache::DebtorReportCache;
use crate::error::ReportError;

/// Service producing the debtor report
///
/// Holds no locks: two requests that miss the cache at the same time both
/// query the billing store and both write the cache, and the later write wins.
#[derive(Clone)]
pub struct DebtorReportService {
    billing: Arc<dyn BillingStorePort>,
    cache: DebtorReportCache,
    clock: Arc<dyn Clock>,
}

impl DebtorReportService {
    /// Creates a new service
    ///
    /// # Arguments
    ///
    /// * `billing` - Source of billing facts
    /// * `cache` - Snapshot cache
    /// * `clock` - Supplies the reference date for debt computation
    pub fn new(
        billing: Arc<dyn BillingStorePort>,
        cache: DebtorReportCache,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { billing, cache, clock }
    }

    /// Returns the underlying cache
    pub fn cache(&self) -> &DebtorReportCache {
        &self.cache
    }

    /// Returns the current debtor report
    ///
    /// This method:
    /// 1. Reads the cached snapshot
    /// 2. Returns it unchanged if it is non-empty
    /// 3. Otherwise lists overdue active subscribers and computes each report
    /// 4. Writes the fresh set back to the cache (an empty set stores nothing)
    /// 5. Returns the fresh set
    ///
    /// # Errors
    ///
    /// - `ReportError::SourceUnavailable` if the billing store cannot be read;
    ///   the cache is left untouched
    /// - `ReportError::InvalidRecord` if any record fails validation; nothing
    ///   is written to the cache
    /// - `ReportError::CacheUnavailable` if the cache store fails
    #[instrument(skip(self))]
    pub async fn get_debtor_report(&self) -> Result<Vec<DebtorReport>, ReportError> {
        let cached = self.cache.get().await?;
        if !cached.is_empty() {
            debug!(entries = cached.len(), "Debtor report served from cache");
            return Ok(cached);
        }

        debug!("Debtor report cache miss, recomputing");

        let records = self.billing.list_overdue_active().await.map_err(|e| {
            error!(error = %e, "Failed to read billing store");
            ReportError::SourceUnavailable(e)
        })?;

        let as_of = self.clock.today();
        let reports = records
            .iter()
            .map(|record| debt::compute(record, as_of))
            .collect::<Result<Vec<_>, _>>()?;

        self.cache.put(&reports).await?;

        info!(debtors = reports.len(), %as_of, "Debtor report recomputed");
        Ok(reports)
    }

    /// Drops the cached snapshot so the next request recomputes it
    ///
    /// # Errors
    ///
    /// Returns `ReportError::CacheUnavailable` if the cache store fails
    #[instrument(skip(self))]
    pub async fn clear_cache(&self) -> Result<(), ReportError> {
        self.cache.invalidate().await?;
        info!("Debtor report cache cleared");
        Ok(())
    }
}

impl std::fmt::Debug for DebtorReportService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebtorReportService")
            .field("cache", &self.cache)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
