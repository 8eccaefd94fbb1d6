use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{billing, CreatePlanRequest, Plan, UpdatePlanRequest},
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub include_inactive: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct InstallmentQuery {
    pub count: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct InstallmentPlan {
    pub total_cents: i64,
    pub installments: Vec<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Plan>>> {
    let plan_service = &state.service_context.plan_service;
    let plans = if query.include_inactive.unwrap_or(false) {
        plan_service.list_plans(true).await?
    } else {
        plan_service.list_active_plans().await?
    };
    Ok(Json(plans))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Plan>> {
    let plan = state.service_context.plan_service.get_plan(id).await?;
    Ok(Json(plan))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<Plan>)> {
    let plan = state.service_context.plan_service.create_plan(request).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePlanRequest>,
) -> Result<Json<Plan>> {
    let plan = state.service_context.plan_service.update_plan(id, request).await?;
    Ok(Json(plan))
}

/// Suggested split of a plan's full price.
pub async fn installments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<InstallmentQuery>,
) -> Result<Json<InstallmentPlan>> {
    let plan = state.service_context.plan_service.get_plan(id).await?;
    let count = query
        .count
        .unwrap_or(state.settings.billing.default_installment_count);

    Ok(Json(InstallmentPlan {
        total_cents: plan.price_cents,
        installments: billing::distribute_installments(plan.price_cents, count)?,
    }))
}
