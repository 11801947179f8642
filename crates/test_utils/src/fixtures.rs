//! Pre-built Test Fixtures
//!
//! Ready-to-use billing data anchored to a fixed reference date so that
//! overdue figures are predictable.

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use rust_decimal_macros::dec;

use core_kernel::{Clock, ManualClock, Ric};
use domain_billing::BillingRecord;

/// Fixture for dates and clocks
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Reference date used throughout the test suite (15 June 2024)
    pub fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    /// Date `days` before the reference date
    pub fn days_ago(days: u64) -> NaiveDate {
        Self::as_of().checked_sub_days(Days::new(days)).unwrap()
    }

    /// Manual clock frozen at midday of the reference date
    pub fn clock() -> ManualClock {
        ManualClock::on_date(Self::as_of())
    }

    /// Manual clock as a shared trait object plus a handle to advance it
    pub fn shared_clock() -> (Arc<dyn Clock>, ManualClock) {
        let clock = Self::clock();
        (Arc::new(clock.clone()), clock)
    }
}

/// Fixture for billing records
pub struct BillingFixtures;

impl BillingFixtures {
    /// Active subscriber 35 days behind on a 150.00 fee (owes 300.00)
    pub fn debtor_35_days() -> BillingRecord {
        BillingRecord::new(Ric::new("RIC-10001").unwrap(), "Shevchenko T.", dec!(150.00))
            .with_last_payment(TemporalFixtures::days_ago(35))
    }

    /// Active subscriber 61 days behind on a 250.00 fee (owes 750.00)
    pub fn debtor_61_days() -> BillingRecord {
        BillingRecord::new(Ric::new("RIC-10002").unwrap(), "Boiko O.", dec!(250.00))
            .with_last_payment(TemporalFixtures::days_ago(61))
    }

    /// Active subscriber who paid today
    pub fn paid_today() -> BillingRecord {
        BillingRecord::new(Ric::new("RIC-10003").unwrap(), "Koval I.", dec!(500.00))
            .with_last_payment(TemporalFixtures::as_of())
    }

    /// Active subscriber with no recorded payment
    pub fn never_paid() -> BillingRecord {
        BillingRecord::new(Ric::new("RIC-10004").unwrap(), "Melnyk P.", dec!(150.00))
    }

    /// Inactive subscriber far behind on payments
    pub fn inactive_debtor() -> BillingRecord {
        BillingRecord::new(Ric::new("RIC-10005").unwrap(), "Tkachenko V.", dec!(500.00))
            .with_last_payment(TemporalFixtures::days_ago(120))
            .deactivated()
    }

    /// Overdue record carrying a negative fee
    pub fn negative_fee_debtor() -> BillingRecord {
        BillingRecord::new(Ric::new("RIC-10006").unwrap(), "Broken Row", dec!(-10.00))
            .with_last_payment(TemporalFixtures::days_ago(45))
    }

    /// A mix of debtors and non-debtors
    pub fn mixed_portfolio() -> Vec<BillingRecord> {
        vec![
            Self::debtor_35_days(),
            Self::paid_today(),
            Self::debtor_61_days(),
            Self::never_paid(),
            Self::inactive_debtor(),
        ]
    }
}
