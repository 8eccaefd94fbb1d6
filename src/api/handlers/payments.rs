use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{Payment, PaymentDetails, PaymentMethod, RecordPaymentRequest},
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct PaymentBody {
    pub amount_cents: i64,
    pub method: PaymentMethod,
    /// Defaults to today.
    pub payment_date: Option<NaiveDate>,
    pub screenshot_ref: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InstallmentQuery {
    pub count: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct RemainingInstallments {
    pub balance_due_cents: i64,
    pub installments: Vec<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    Path(membership_id): Path<Uuid>,
) -> Result<Json<Vec<Payment>>> {
    let payments = state.service_context.ledger_service.list_payments(membership_id).await?;
    Ok(Json(payments))
}

pub async fn create(
    State(state): State<AppState>,
    Path(membership_id): Path<Uuid>,
    Json(body): Json<PaymentBody>,
) -> Result<(StatusCode, Json<Payment>)> {
    let ctx = &state.service_context;
    let payment = ctx
        .ledger_service
        .add_payment(RecordPaymentRequest {
            membership_id,
            details: PaymentDetails {
                amount_cents: body.amount_cents,
                method: body.method,
                payment_date: body.payment_date.unwrap_or_else(|| ctx.clock.today()),
                screenshot_ref: body.screenshot_ref,
                notes: body.notes,
            },
        })
        .await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// Suggested split of what is still owed on a membership.
pub async fn installments(
    State(state): State<AppState>,
    Path(membership_id): Path<Uuid>,
    Query(query): Query<InstallmentQuery>,
) -> Result<Json<RemainingInstallments>> {
    let ledger = &state.service_context.ledger_service;
    let count = query
        .count
        .unwrap_or(state.settings.billing.default_installment_count);

    let installments = ledger.suggest_installments(membership_id, count).await?;
    Ok(Json(RemainingInstallments {
        balance_due_cents: installments.iter().sum(),
        installments,
    }))
}
