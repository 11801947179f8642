//! Billing Domain - Subscriber Billing and Debt Calculation
//!
//! This crate holds the billing facts the back office keeps per subscriber and
//! the pure calculation that turns them into debtor figures.
//!
//! # Debt Rules
//!
//! - Overdue days are whole days between the last payment and the reference date
//! - Any started 30-day period counts as a full overdue month
//! - Debt is the monthly fee times overdue months, rounded to 2 decimal places
//! - Only active subscribers whose last payment is older than one calendar month
//!   are considered debtors
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{BillingRecord, debt};
//!
//! let report = debt::compute(&record, clock.today())?;
//! println!("{} owes {}", report.ric, report.debt_amount);
//! ```

pub mod subscriber;
pub mod debt;
pub mod ports;
pub mod error;

pub use subscriber::{Subscriber, BillingRecord};
pub use debt::{DebtorReport, compute, overdue_threshold};
pub use ports::BillingStorePort;
pub use error::BillingError;
