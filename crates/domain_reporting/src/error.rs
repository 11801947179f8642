//! Reporting domain errors

use thiserror::Error;

use core_kernel::PortError;
use domain_billing::BillingError;

/// Errors raised by the debtor report pipeline
#[derive(Debug, Error)]
pub enum ReportError {
    /// A billing record could not be turned into a report
    #[error(transparent)]
    InvalidRecord(#[from] BillingError),

    /// The billing store could not be read
    #[error("Billing store unavailable: {0}")]
    SourceUnavailable(#[source] PortError),

    /// The cache store could not be read or written
    #[error("Report cache unavailable: {0}")]
    CacheUnavailable(#[source] PortError),

    /// A single cached entry failed to parse
    ///
    /// Reported through logging only; a read skips the entry and keeps going.
    #[error("Corrupt cache entry {index} under '{key}': {reason}")]
    CorruptCacheEntry {
        key: String,
        index: usize,
        reason: String,
    },
}

impl ReportError {
    /// Returns true if retrying later may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ReportError::SourceUnavailable(e) | ReportError::CacheUnavailable(e) => e.is_transient(),
            _ => false,
        }
    }
}
