pub mod handlers;
pub mod state;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    config::Settings,
    service::ServiceContext,
};
use state::AppState;

pub fn create_app(service_context: Arc<ServiceContext>, settings: Arc<Settings>) -> Router {
    // Multipart framing on top of the largest accepted screenshot
    let upload_limit = settings.storage.max_file_size_bytes + 64 * 1024;
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        // API routes
        .nest("/api", api_routes(upload_limit))

        // Add state to the router
        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Configure properly for production
        .layer(TraceLayer::new_for_http())
}

fn api_routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .nest("/plans", plan_routes())
        .nest("/members", member_routes())
        .nest("/memberships", membership_routes())
        .nest("/reports", report_routes())
        .route(
            "/screenshots",
            post(handlers::screenshots::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
}

fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::plans::list).post(handlers::plans::create))
        .route("/:id", get(handlers::plans::get).put(handlers::plans::update))
        .route("/:id/installments", get(handlers::plans::installments))
}

fn member_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::members::list).post(handlers::members::create))
        .route("/:id", get(handlers::members::get))
        .route("/:id/summary", get(handlers::members::summary))
        .route("/:id/payments", get(handlers::members::payment_history))
        .route(
            "/:id/memberships",
            get(handlers::memberships::list_by_member).post(handlers::memberships::create),
        )
        .route("/:id/renew", post(handlers::memberships::renew))
        .route("/:id/active-membership", get(handlers::memberships::active))
        .route("/:id/status", get(handlers::memberships::status))
}

fn membership_routes() -> Router<AppState> {
    Router::new()
        .route("/:id", get(handlers::memberships::get))
        .route(
            "/:id/payments",
            get(handlers::payments::list).post(handlers::payments::create),
        )
        .route("/:id/installments", get(handlers::payments::installments))
}

fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/expiring", get(handlers::reports::expiring))
        .route("/outstanding", get(handlers::reports::outstanding))
}
