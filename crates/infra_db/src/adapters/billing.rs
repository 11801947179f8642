//! PostgreSQL Billing Store Adapter
//!
//! Implements `BillingStorePort` on top of the `SubscriberRepository`.
//!
//! "Today" comes from an injected clock rather than `CURRENT_DATE`, so the
//! debtor filter and the debt calculation always agree on the reference date
//! even when the database runs in a different time zone.
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresBillingStore;
//! use domain_billing::BillingStorePort;
//!
//! let store: Arc<dyn BillingStorePort> = Arc::new(PostgresBillingStore::new(pool));
//! let records = store.list_overdue_active().await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, instrument};

use core_kernel::{Clock, DomainPort, HealthCheckResult, HealthCheckable, PortError, SystemClock};
use domain_billing::{BillingRecord, BillingStorePort};

use crate::repositories::SubscriberRepository;

const ADAPTER_ID: &str = "postgres-billing-store";

/// PostgreSQL-backed implementation of the BillingStorePort trait
///
/// Database errors are translated to `PortError`: connection problems become
/// `PortError::Connection`, unmappable rows become `PortError::Transformation`.
#[derive(Debug, Clone)]
pub struct PostgresBillingStore {
    repository: SubscriberRepository,
    pool: PgPool,
    clock: Arc<dyn Clock>,
}

impl PostgresBillingStore {
    /// Creates an adapter that uses the system clock
    pub fn new(pool: PgPool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    /// Creates an adapter with an explicit clock
    pub fn with_clock(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository: SubscriberRepository::new(pool.clone()),
            pool,
            clock,
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &SubscriberRepository {
        &self.repository
    }
}

impl DomainPort for PostgresBillingStore {}

#[async_trait]
impl HealthCheckable for PostgresBillingStore {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult::healthy(ADAPTER_ID, latency_ms),
            Err(e) => HealthCheckResult::unhealthy(ADAPTER_ID, latency_ms, format!("Database error: {}", e)),
        }
    }
}

#[async_trait]
impl BillingStorePort for PostgresBillingStore {
    #[instrument(skip(self))]
    async fn list_overdue_active(&self) -> Result<Vec<BillingRecord>, PortError> {
        let as_of = self.clock.today();
        self.repository
            .list_overdue_active(as_of)
            .await
            .map_err(|e| {
                error!(error = %e, %as_of, "Overdue subscriber query failed");
                PortError::from(e)
            })
    }
}
