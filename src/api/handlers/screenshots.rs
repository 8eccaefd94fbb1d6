use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    api::state::AppState,
    error::{AppError, Result},
};

/// Accepts a multipart upload with a `file` field and returns the reference
/// to put in a payment's `screenshot_ref`.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidArgument(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidArgument(format!("Failed to read upload: {}", e)))?;

        let reference = state
            .service_context
            .screenshot_store
            .store_screenshot(&filename, &data)
            .await?;

        return Ok((StatusCode::CREATED, Json(json!({ "reference": reference }))));
    }

    Err(AppError::InvalidArgument("Missing `file` field".to_string()))
}
