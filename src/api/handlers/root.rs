use axum::{http::StatusCode, Json, response::IntoResponse};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Dues API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Membership billing and renewal engine",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "plans": "/api/plans",
            "members": "/api/members",
            "memberships": "/api/memberships",
            "reports": "/api/reports"
        }
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
