//! Subscriber repository implementation
//!
//! Database access for the `subscribers` table: schema bootstrap, inserts
//! used for seeding, lookups, deactivation, and the overdue-billing query
//! that feeds the debtor report.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::Ric;
use domain_billing::{BillingRecord, Subscriber};

use crate::error::DatabaseError;

const SCHEMA: &str = include_str!("../../../../migrations/20240101_000001_subscribers.sql");

/// Repository for subscriber rows
#[derive(Debug, Clone)]
pub struct SubscriberRepository {
    pool: PgPool,
}

impl SubscriberRepository {
    /// Creates a new SubscriberRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the subscribers table and its indexes if they are missing
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Inserts a subscriber, leaving an existing row with the same RIC untouched
    ///
    /// # Returns
    ///
    /// `true` if a row was inserted, `false` if the RIC already existed
    #[instrument(skip(self, subscriber), fields(ric = %subscriber.ric))]
    pub async fn insert(&self, subscriber: &Subscriber) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            r#"
            INSERT INTO subscribers (
                ric, pin_code, full_name, phone_model, phone_type,
                service_type, contract_start_date, contract_duration_months,
                monthly_fee, is_active, last_payment_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (ric) DO NOTHING
            "#,
        )
        .bind(subscriber.ric.as_str())
        .bind(&subscriber.pin_code)
        .bind(&subscriber.full_name)
        .bind(&subscriber.phone_model)
        .bind(&subscriber.phone_type)
        .bind(&subscriber.service_type)
        .bind(subscriber.contract_start_date)
        .bind(subscriber.contract_duration_months)
        .bind(subscriber.monthly_fee)
        .bind(subscriber.is_active)
        .bind(subscriber.last_payment_date)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Looks up a subscriber by RIC
    pub async fn find_by_ric(&self, ric: &Ric) -> Result<Option<Subscriber>, DatabaseError> {
        let row = sqlx::query_as::<_, SubscriberRow>(
            r#"
            SELECT
                ric, pin_code, full_name, phone_model, phone_type,
                service_type, contract_start_date, contract_duration_months,
                monthly_fee, is_active, last_payment_date
            FROM subscribers
            WHERE ric = $1
            "#,
        )
        .bind(ric.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Subscriber::try_from).transpose()
    }

    /// Marks a subscriber inactive
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no subscriber has this RIC
    #[instrument(skip(self), fields(ric = %ric))]
    pub async fn deactivate(&self, ric: &Ric) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE subscribers SET is_active = FALSE WHERE ric = $1")
            .bind(ric.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Subscriber", ric));
        }
        Ok(())
    }

    /// Lists billing facts of active subscribers last paid more than one
    /// month before `as_of`
    ///
    /// Subscribers without a payment date are excluded. Results are ordered
    /// by RIC.
    #[instrument(skip(self))]
    pub async fn list_overdue_active(&self, as_of: NaiveDate) -> Result<Vec<BillingRecord>, DatabaseError> {
        let rows = sqlx::query_as::<_, BillingRow>(
            r#"
            SELECT ric, full_name, monthly_fee, last_payment_date, is_active
            FROM subscribers
            WHERE last_payment_date < $1::date - INTERVAL '1 month'
              AND is_active = TRUE
            ORDER BY ric
            "#,
        )
        .bind(as_of)
        .fetch_all(&self.pool)
        .await?;

        debug!(rows = rows.len(), "Fetched overdue active subscribers");
        rows.into_iter().map(BillingRecord::try_from).collect()
    }
}

/// Database row for a full subscriber
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SubscriberRow {
    pub ric: String,
    pub pin_code: String,
    pub full_name: String,
    pub phone_model: String,
    pub phone_type: String,
    pub service_type: String,
    pub contract_start_date: NaiveDate,
    pub contract_duration_months: i32,
    pub monthly_fee: Decimal,
    pub is_active: bool,
    pub last_payment_date: Option<NaiveDate>,
}

/// Database row for the billing projection
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BillingRow {
    pub ric: String,
    pub full_name: String,
    pub monthly_fee: Decimal,
    pub last_payment_date: Option<NaiveDate>,
    pub is_active: bool,
}

fn parse_ric(raw: &str) -> Result<Ric, DatabaseError> {
    Ric::new(raw).map_err(|e| DatabaseError::InvalidRow(format!("subscribers.ric '{}': {}", raw, e)))
}

impl TryFrom<SubscriberRow> for Subscriber {
    type Error = DatabaseError;

    fn try_from(row: SubscriberRow) -> Result<Self, Self::Error> {
        Ok(Subscriber {
            ric: parse_ric(&row.ric)?,
            pin_code: row.pin_code,
            full_name: row.full_name,
            phone_model: row.phone_model,
            phone_type: row.phone_type,
            service_type: row.service_type,
            contract_start_date: row.contract_start_date,
            contract_duration_months: row.contract_duration_months,
            monthly_fee: row.monthly_fee,
            is_active: row.is_active,
            last_payment_date: row.last_payment_date,
        })
    }
}

impl TryFrom<BillingRow> for BillingRecord {
    type Error = DatabaseError;

    fn try_from(row: BillingRow) -> Result<Self, Self::Error> {
        Ok(BillingRecord {
            ric: parse_ric(&row.ric)?,
            full_name: row.full_name,
            monthly_fee: row.monthly_fee,
            last_payment_date: row.last_payment_date,
            is_active: row.is_active,
        })
    }
}
