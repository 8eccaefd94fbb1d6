use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    api::state::AppState,
    domain::{ExpiringMembership, OutstandingBalance},
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct ExpiringQuery {
    pub days: Option<i64>,
}

pub async fn expiring(
    State(state): State<AppState>,
    Query(query): Query<ExpiringQuery>,
) -> Result<Json<Vec<ExpiringMembership>>> {
    let days = query
        .days
        .unwrap_or(state.settings.billing.expiring_window_days);
    let expiring = state.service_context.report_service.expiring_memberships(days).await?;
    Ok(Json(expiring))
}

pub async fn outstanding(State(state): State<AppState>) -> Result<Json<Vec<OutstandingBalance>>> {
    let outstanding = state.service_context.report_service.outstanding_balances().await?;
    Ok(Json(outstanding))
}
