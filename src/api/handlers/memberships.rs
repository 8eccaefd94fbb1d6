use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{
        BillingStatus, CreateMembershipRequest, InitialPayment, Membership,
        RenewMembershipRequest,
    },
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct CreateMembershipBody {
    pub plan_id: Uuid,
    /// Defaults to today.
    pub start_date: Option<NaiveDate>,
    pub initial_payment: Option<InitialPayment>,
    pub notes: Option<String>,
}

pub async fn list_by_member(
    State(state): State<AppState>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<Vec<Membership>>> {
    let memberships = state
        .service_context
        .membership_service
        .list_memberships(member_id)
        .await?;
    Ok(Json(memberships))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Membership>> {
    let membership = state.service_context.membership_service.get_membership(id).await?;
    Ok(Json(membership))
}

pub async fn create(
    State(state): State<AppState>,
    Path(member_id): Path<Uuid>,
    Json(body): Json<CreateMembershipBody>,
) -> Result<(StatusCode, Json<Membership>)> {
    let ctx = &state.service_context;
    let membership = ctx
        .membership_service
        .create_membership(CreateMembershipRequest {
            member_id,
            plan_id: body.plan_id,
            start_date: body.start_date.unwrap_or_else(|| ctx.clock.today()),
            initial_payment: body.initial_payment,
            notes: body.notes,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(membership)))
}

pub async fn renew(
    State(state): State<AppState>,
    Path(member_id): Path<Uuid>,
    Json(request): Json<RenewMembershipRequest>,
) -> Result<(StatusCode, Json<Membership>)> {
    let membership = state
        .service_context
        .membership_service
        .renew(member_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(membership)))
}

pub async fn active(
    State(state): State<AppState>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<Option<Membership>>> {
    let membership = state
        .service_context
        .membership_service
        .get_active_membership(member_id)
        .await?;
    Ok(Json(membership))
}

pub async fn status(
    State(state): State<AppState>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<BillingStatus>> {
    let status = state.service_context.membership_service.get_status(member_id).await?;
    Ok(Json(status))
}
