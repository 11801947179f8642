//! Debtor report handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::{AppState, error::ApiError};
use crate::dto::debtors::DebtorReportResponse;

/// Returns every active subscriber more than a month behind on payment
pub async fn get_debtors(
    State(state): State<AppState>,
) -> Result<Json<DebtorReportResponse>, ApiError> {
    let debtors = state.service.get_debtor_report().await?;
    Ok(Json(debtors.into()))
}

/// Drops the cached debtor snapshot
pub async fn clear_cache(
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state.service.clear_cache().await?;
    Ok(StatusCode::NO_CONTENT)
}
