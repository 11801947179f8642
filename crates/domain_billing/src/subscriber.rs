//! Subscriber and billing record types
//!
//! `Subscriber` mirrors a row of the relational subscribers table. The debtor
//! pipeline only needs the billing projection of it, `BillingRecord`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::Ric;

use crate::debt::overdue_threshold;

/// A subscriber contract as stored in the relational store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    /// Unique subscriber identifier
    pub ric: Ric,
    /// SIM PIN code
    pub pin_code: String,
    /// Full name of the subscriber
    pub full_name: String,
    /// Handset model
    pub phone_model: String,
    /// Handset category (smartphone, feature phone, ...)
    pub phone_type: String,
    /// Tariff plan name
    pub service_type: String,
    /// Date the contract was signed
    pub contract_start_date: NaiveDate,
    /// Contract length in months
    pub contract_duration_months: i32,
    /// Monthly fee
    pub monthly_fee: Decimal,
    /// Whether the contract is active
    pub is_active: bool,
    /// Date of the most recent payment, if any
    pub last_payment_date: Option<NaiveDate>,
}

impl Subscriber {
    /// Total contract value: duration in months times the monthly fee
    pub fn total_cost(&self) -> Decimal {
        Decimal::from(self.contract_duration_months) * self.monthly_fee
    }

    /// Projects the billing facts used by debt computation
    pub fn billing_record(&self) -> BillingRecord {
        BillingRecord {
            ric: self.ric.clone(),
            full_name: self.full_name.clone(),
            monthly_fee: self.monthly_fee,
            last_payment_date: self.last_payment_date,
            is_active: self.is_active,
        }
    }
}

/// Billing facts for a single subscriber
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingRecord {
    /// Unique subscriber identifier
    pub ric: Ric,
    /// Display name
    pub full_name: String,
    /// Monthly fee, expected to be non-negative
    pub monthly_fee: Decimal,
    /// Date of the most recent payment, if any
    pub last_payment_date: Option<NaiveDate>,
    /// Whether the contract is active
    pub is_active: bool,
}

impl BillingRecord {
    /// Creates an active record with no recorded payment
    pub fn new(ric: Ric, full_name: impl Into<String>, monthly_fee: Decimal) -> Self {
        Self {
            ric,
            full_name: full_name.into(),
            monthly_fee,
            last_payment_date: None,
            is_active: true,
        }
    }

    /// Sets the last payment date
    pub fn with_last_payment(mut self, date: NaiveDate) -> Self {
        self.last_payment_date = Some(date);
        self
    }

    /// Marks the record as inactive
    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Returns true when the record belongs in the debtor report as of `as_of`
    ///
    /// Eligible records are active and were last paid strictly before
    /// `as_of` minus one calendar month. Records without a payment date are
    /// never eligible.
    pub fn is_debt_eligible(&self, as_of: NaiveDate) -> bool {
        match self.last_payment_date {
            Some(paid) if self.is_active => paid < overdue_threshold(as_of),
            _ => false,
        }
    }
}
