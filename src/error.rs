use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::domain::billing::{compute_balance, format_amount};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{}", describe_overpayment(.attempted_cents, .already_paid_cents, .price_cents))]
    OverpaymentRejected {
        attempted_cents: i64,
        already_paid_cents: i64,
        price_cents: i64,
    },

    #[error("Plan is no longer offered: {0}")]
    PlanInactive(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn overpayment(attempted_cents: i64, already_paid_cents: i64, price_cents: i64) -> Self {
        AppError::OverpaymentRejected {
            attempted_cents,
            already_paid_cents,
            price_cents,
        }
    }
}

fn describe_overpayment(attempted_cents: &i64, already_paid_cents: &i64, price_cents: &i64) -> String {
    format!(
        "Payment of {} exceeds remaining balance of {} (paid {} of {})",
        format_amount(*attempted_cents),
        format_amount(compute_balance(*price_cents, &[*already_paid_cents])),
        format_amount(*already_paid_cents),
        format_amount(*price_cents)
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, error_message) = match self {
            AppError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, message),
            AppError::OverpaymentRejected { .. } => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::PlanInactive(_) => (StatusCode::CONFLICT, message),
            AppError::Conflict(_) => (StatusCode::CONFLICT, message),
            AppError::Database(ref msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error occurred".to_string())
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Database(err.to_string())
    }
}
