//! Debt calculation
//!
//! Derived debtor figures are computed by plain functions of a billing record
//! and an explicit reference date. Nothing here reads the system clock.

use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::warn;

use core_kernel::Ric;

use crate::error::BillingError;
use crate::subscriber::BillingRecord;

/// Length of one billing period in days
pub const DAYS_PER_BILLING_MONTH: i64 = 30;

/// Decimal places kept on debt amounts
pub const DEBT_DECIMAL_PLACES: u32 = 2;

/// A subscriber's debt position as of a reference date
///
/// Built fresh from a [`BillingRecord`] and never mutated afterwards. The
/// serialized form carries the derived fields so a cached report reads back
/// exactly as it was computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtorReport {
    /// Unique subscriber identifier
    pub ric: Ric,
    /// Display name
    pub full_name: String,
    /// Monthly fee
    pub monthly_fee: Decimal,
    /// Date of the most recent payment, if any
    pub last_payment_date: Option<NaiveDate>,
    /// Whole days since the last payment
    #[serde(alias = "days_overdue")]
    pub overdue_days: i64,
    /// Amount owed, rounded to 2 decimal places
    pub debt_amount: Decimal,
}

impl DebtorReport {
    /// Number of started billing months the subscriber is behind
    pub fn months_overdue(&self) -> i64 {
        months_overdue(self.overdue_days)
    }

    /// Returns true if the report carries a positive debt
    pub fn has_debt(&self) -> bool {
        self.debt_amount > Decimal::ZERO
    }
}

/// Computes the debtor report for a billing record
///
/// # Arguments
///
/// * `record` - The billing facts of one subscriber
/// * `as_of` - Reference date the overdue period is measured against
///
/// # Errors
///
/// Returns `BillingError::InvalidRecord` if the monthly fee is negative or the
/// debt does not fit in a `Decimal`
pub fn compute(record: &BillingRecord, as_of: NaiveDate) -> Result<DebtorReport, BillingError> {
    if record.monthly_fee < Decimal::ZERO {
        return Err(BillingError::negative_fee(record.ric.as_str(), record.monthly_fee));
    }

    let days = overdue_days(record.last_payment_date, as_of);
    if days < 0 {
        // Future-dated payments are kept as-is; the debt guard treats them as not overdue.
        warn!(
            ric = %record.ric,
            last_payment_date = ?record.last_payment_date,
            %as_of,
            overdue_days = days,
            "Last payment date is after the reference date"
        );
    }

    let debt = debt_amount(record.monthly_fee, days)
        .ok_or_else(|| BillingError::amount_overflow(record.ric.as_str(), record.monthly_fee, days))?;

    Ok(DebtorReport {
        ric: record.ric.clone(),
        full_name: record.full_name.clone(),
        monthly_fee: record.monthly_fee,
        last_payment_date: record.last_payment_date,
        overdue_days: days,
        debt_amount: debt,
    })
}

/// Whole days between the last payment and `as_of`
///
/// Zero when no payment was ever recorded. Not floored at zero: a payment
/// dated after `as_of` yields a negative count.
pub fn overdue_days(last_payment_date: Option<NaiveDate>, as_of: NaiveDate) -> i64 {
    match last_payment_date {
        Some(paid) => (as_of - paid).num_days(),
        None => 0,
    }
}

/// Started 30-day periods covered by `days`, or zero when not overdue
pub fn months_overdue(days: i64) -> i64 {
    if days <= 0 {
        return 0;
    }
    (days + DAYS_PER_BILLING_MONTH - 1) / DAYS_PER_BILLING_MONTH
}

/// Debt owed for `days` overdue at the given monthly fee
///
/// Returns `None` if the product overflows `Decimal`.
pub fn debt_amount(monthly_fee: Decimal, days: i64) -> Option<Decimal> {
    if days <= 0 {
        return Some(Decimal::ZERO);
    }
    Decimal::from(months_overdue(days))
        .checked_mul(monthly_fee)
        .map(|debt| debt.round_dp_with_strategy(DEBT_DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven))
}

/// Last payments strictly before this date make an active subscriber a debtor
///
/// One calendar month before `as_of`, clamped to the end of shorter months
/// (31 March gives 29 February in a leap year).
pub fn overdue_threshold(as_of: NaiveDate) -> NaiveDate {
    as_of.checked_sub_months(Months::new(1)).unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_months_overdue_boundaries() {
        assert_eq!(months_overdue(-5), 0);
        assert_eq!(months_overdue(0), 0);
        assert_eq!(months_overdue(1), 1);
        assert_eq!(months_overdue(30), 1);
        assert_eq!(months_overdue(31), 2);
        assert_eq!(months_overdue(60), 2);
        assert_eq!(months_overdue(61), 3);
    }

    #[test]
    fn test_debt_amount_rounds_to_cents() {
        assert_eq!(debt_amount(dec!(33.333), 10), Some(dec!(33.33)));
        assert_eq!(debt_amount(dec!(0.125), 10), Some(dec!(0.12)));
        assert_eq!(debt_amount(dec!(150), 0), Some(dec!(0.00)));
    }

    #[test]
    fn test_debt_amount_overflow_is_none() {
        assert_eq!(debt_amount(Decimal::MAX, 31), None);
        assert_eq!(debt_amount(Decimal::MAX, 30), Some(Decimal::MAX));
        assert_eq!(debt_amount(Decimal::MAX, -3), Some(Decimal::ZERO));
    }

    #[test]
    fn test_overdue_threshold_clamps_month_end() {
        assert_eq!(overdue_threshold(date(2024, 3, 31)), date(2024, 2, 29));
        assert_eq!(overdue_threshold(date(2023, 3, 31)), date(2023, 2, 28));
        assert_eq!(overdue_threshold(date(2024, 1, 15)), date(2023, 12, 15));
    }

    #[test]
    fn test_overdue_days_without_payment() {
        assert_eq!(overdue_days(None, date(2024, 5, 1)), 0);
    }
}
