//! Route table

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::ready_check))
        .route("/metrics", get(handlers::metrics))
        // Generate
        .route("/", get(handlers::index))
        .route("/generate-qr", post(handlers::generate_qr))
        .route("/api/generate-qr", post(handlers::generate_qr))
        // Redeem
        .route("/call/{token}", get(handlers::redeem_path))
        .route("/api/call", get(handlers::redeem_query))
        .route("/api/call/{token}", get(handlers::redeem_path))
        .route("/api", get(handlers::action_get).post(handlers::action_post))
        // Admin
        .route("/admin/mappings", get(handlers::admin_mappings))
        .fallback(handlers::not_found)
        .layer(CatchPanicLayer::custom(handlers::panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
