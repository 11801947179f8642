//! Billing Store Port
//!
//! The relational store owns billing facts; the debtor pipeline only reads
//! them. Adapters live in `infra_db` (PostgreSQL) and `test_utils` (in-memory).

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PortError};

use crate::subscriber::BillingRecord;

/// Read access to subscriber billing facts
#[async_trait]
pub trait BillingStorePort: DomainPort + HealthCheckable {
    /// Lists active subscribers whose last payment is older than one month
    ///
    /// Equivalent to `is_active = TRUE AND last_payment_date < today - 1 month`,
    /// where "today" is the store's own notion of the current date. Ordering
    /// is whatever the underlying query yields.
    async fn list_overdue_active(&self) -> Result<Vec<BillingRecord>, PortError>;
}
