//! Test Data Builders
//!
//! Builders with sensible defaults so tests only spell out the fields they
//! care about.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::Ric;
use domain_billing::{BillingRecord, Subscriber};

use crate::fixtures::TemporalFixtures;

/// Builder for billing records
pub struct BillingRecordBuilder {
    ric: String,
    full_name: String,
    monthly_fee: Decimal,
    last_payment_date: Option<NaiveDate>,
    is_active: bool,
}

impl Default for BillingRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BillingRecordBuilder {
    /// Creates a builder for an active 150.00 subscriber paid 35 days ago
    pub fn new() -> Self {
        Self {
            ric: "RIC-20000".to_string(),
            full_name: "Test Subscriber".to_string(),
            monthly_fee: dec!(150.00),
            last_payment_date: Some(TemporalFixtures::days_ago(35)),
            is_active: true,
        }
    }

    /// Sets the RIC
    pub fn with_ric(mut self, ric: impl Into<String>) -> Self {
        self.ric = ric.into();
        self
    }

    /// Sets the display name
    pub fn with_full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = name.into();
        self
    }

    /// Sets the monthly fee
    pub fn with_monthly_fee(mut self, fee: Decimal) -> Self {
        self.monthly_fee = fee;
        self
    }

    /// Sets the last payment to `days` before the reference date
    pub fn paid_days_ago(mut self, days: u64) -> Self {
        self.last_payment_date = Some(TemporalFixtures::days_ago(days));
        self
    }

    /// Sets or clears the last payment date
    pub fn with_last_payment_date(mut self, date: Option<NaiveDate>) -> Self {
        self.last_payment_date = date;
        self
    }

    /// Sets the active flag
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Builds the record
    ///
    /// # Panics
    ///
    /// Panics if the RIC is blank
    pub fn build(self) -> BillingRecord {
        BillingRecord {
            ric: Ric::new(&self.ric).expect("builder RIC must be valid"),
            full_name: self.full_name,
            monthly_fee: self.monthly_fee,
            last_payment_date: self.last_payment_date,
            is_active: self.is_active,
        }
    }

    /// Builds the full subscriber row around the billing facts
    pub fn build_subscriber(self) -> Subscriber {
        let record = self.build();
        Subscriber {
            ric: record.ric,
            pin_code: "1234".to_string(),
            full_name: record.full_name,
            phone_model: "Pixel 7".to_string(),
            phone_type: "Smartphone".to_string(),
            service_type: "Standard".to_string(),
            contract_start_date: TemporalFixtures::days_ago(400),
            contract_duration_months: 12,
            monthly_fee: record.monthly_fee,
            is_active: record.is_active,
            last_payment_date: record.last_payment_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_describe_a_debtor() {
        let record = BillingRecordBuilder::new().build();
        assert!(record.is_debt_eligible(TemporalFixtures::as_of()));
    }

    #[test]
    fn test_subscriber_carries_billing_facts() {
        let sub = BillingRecordBuilder::new()
            .with_ric("RIC-1")
            .with_monthly_fee(dec!(250))
            .active(false)
            .build_subscriber();

        assert_eq!(sub.ric.as_str(), "RIC-1");
        assert_eq!(sub.monthly_fee, dec!(250));
        assert!(!sub.is_active);
    }
}
