//! Reporting Domain - Debtor Report Pipeline
//!
//! The debtor report is expensive to derive (every overdue subscriber, every
//! debt figure), so it is cached as one snapshot under a fixed key with a
//! one-hour expiry.
//!
//! # Components
//!
//! - [`DebtorReportCache`]: stores, reads and invalidates the snapshot through
//!   a [`CacheStorePort`]
//! - [`DebtorReportService`]: serves the snapshot, or recomputes it from the
//!   billing store on a miss and writes it back
//! - [`memory::InMemoryCacheStore`]: clock-driven cache store for tests and
//!   single-process deployments
//!
//! # Cache Policy
//!
//! An empty report is never stored. "No debtors" therefore reads back as a
//! miss and the next request queries the billing store again.

pub mod cache;
pub mod memory;
pub mod service;
pub mod error;

pub use cache::{CacheStorePort, DebtorCacheConfig, DebtorReportCache, DEFAULT_CACHE_KEY, DEFAULT_TTL};
pub use memory::InMemoryCacheStore;
pub use service::DebtorReportService;
pub use error::ReportError;
