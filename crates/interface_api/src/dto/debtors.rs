//! Debtor report DTOs

use rust_decimal::Decimal;
use serde::Serialize;

use domain_billing::DebtorReport;

#[derive(Debug, Serialize)]
pub struct DebtorReportResponse {
    pub count: usize,
    pub total_debt: Decimal,
    pub debtors: Vec<DebtorReport>,
}

impl From<Vec<DebtorReport>> for DebtorReportResponse {
    fn from(debtors: Vec<DebtorReport>) -> Self {
        let total_debt = debtors.iter().map(|d| d.debt_amount).sum();
        Self {
            count: debtors.len(),
            total_debt,
            debtors,
        }
    }
}
