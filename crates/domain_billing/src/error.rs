//! Billing domain errors

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur in the billing domain
#[derive(Debug, Error, PartialEq)]
pub enum BillingError {
    /// The billing input cannot be used for debt computation
    #[error("Invalid billing record {ric}: {reason}")]
    InvalidRecord {
        ric: String,
        reason: String,
    },
}

impl BillingError {
    /// Creates an invalid-record error for a negative monthly fee
    pub fn negative_fee(ric: impl Into<String>, fee: Decimal) -> Self {
        BillingError::InvalidRecord {
            ric: ric.into(),
            reason: format!("monthly fee must not be negative, got {}", fee),
        }
    }

    /// Creates an invalid-record error for a debt too large to represent
    pub fn amount_overflow(ric: impl Into<String>, fee: Decimal, overdue_days: i64) -> Self {
        BillingError::InvalidRecord {
            ric: ric.into(),
            reason: format!("debt for fee {} over {} overdue days overflows", fee, overdue_days),
        }
    }
}
