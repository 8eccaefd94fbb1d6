use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{CreateMemberRequest, Member, MemberSummary, Payment},
    error::Result,
};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Member>>> {
    let members = state.service_context.member_service.list_members().await?;
    Ok(Json(members))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateMemberRequest>,
) -> Result<(StatusCode, Json<Member>)> {
    let member = state.service_context.member_service.create_member(request).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Member>> {
    let member = state.service_context.member_service.get_member(id).await?;
    Ok(Json(member))
}

pub async fn summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MemberSummary>> {
    let summary = state.service_context.report_service.member_summary(id).await?;
    Ok(Json(summary))
}

pub async fn payment_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Payment>>> {
    let payments = state.service_context.report_service.member_payment_history(id).await?;
    Ok(Json(payments))
}
