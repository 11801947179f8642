//! Property-Based and Randomized Test Data
//!
//! Proptest strategies that respect billing invariants, plus a `fake`-backed
//! generator for seeding a database with plausible subscribers.

use chrono::{Days, NaiveDate};
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::Ric;
use domain_billing::{BillingRecord, Subscriber};

const PHONE_MODELS: &[&str] = &["iPhone 13", "Samsung S21", "Xiaomi Redmi 9", "Nokia 3310", "Pixel 7"];
const SERVICE_TYPES: &[&str] = &["Premium", "Standard", "Economy", "Student"];
const MONTHLY_FEES: &[i64] = &[150, 250, 500];

/// Strategy for valid RICs
pub fn ric_strategy() -> impl Strategy<Value = Ric> {
    (10_000u32..100_000u32).prop_map(|n| Ric::new(format!("RIC-{n}")).unwrap())
}

/// Strategy for non-negative monthly fees with two decimal places
pub fn monthly_fee_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..100_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for optional last payment dates within a year around `as_of`
pub fn last_payment_strategy(as_of: NaiveDate) -> impl Strategy<Value = Option<NaiveDate>> {
    prop_oneof![
        1 => Just(None::<NaiveDate>),
        8 => (0u64..365).prop_map(move |d| as_of.checked_sub_days(Days::new(d))),
        1 => (1u64..30).prop_map(move |d| as_of.checked_add_days(Days::new(d))),
    ]
}

/// Strategy for well-formed billing records
pub fn billing_record_strategy(as_of: NaiveDate) -> impl Strategy<Value = BillingRecord> {
    (
        ric_strategy(),
        "[A-Z][a-z]{2,12} [A-Z]\\.",
        monthly_fee_strategy(),
        last_payment_strategy(as_of),
        any::<bool>(),
    )
        .prop_map(|(ric, full_name, monthly_fee, last_payment_date, is_active)| BillingRecord {
            ric,
            full_name,
            monthly_fee,
            last_payment_date,
            is_active,
        })
}

/// Generates a random subscriber paid within the last 60 days of `as_of`
pub fn random_subscriber(as_of: NaiveDate) -> Subscriber {
    let first: String = FirstName().fake();
    let last: String = LastName().fake();
    let ric_number: u32 = (10_000..100_000).fake();
    let pin: u32 = (1_000..10_000).fake();
    let started_days_ago: u64 = (100..1_000).fake();
    let paid_days_ago: u64 = (0..61).fake();
    let active_roll: u8 = (0..3).fake();

    Subscriber {
        ric: Ric::new(format!("RIC-{ric_number}")).unwrap(),
        pin_code: pin.to_string(),
        full_name: format!("{last} {}.", first.chars().next().unwrap_or('X')),
        phone_model: pick(PHONE_MODELS).to_string(),
        phone_type: "Smartphone".to_string(),
        service_type: pick(SERVICE_TYPES).to_string(),
        contract_start_date: as_of.checked_sub_days(Days::new(started_days_ago)).unwrap(),
        contract_duration_months: 12,
        monthly_fee: Decimal::from(*pick(MONTHLY_FEES)),
        // Two in three generated subscribers are active.
        is_active: active_roll != 0,
        last_payment_date: as_of.checked_sub_days(Days::new(paid_days_ago)),
    }
}

fn pick<T>(items: &[T]) -> &T {
    let index: usize = (0..items.len()).fake();
    &items[index]
}
