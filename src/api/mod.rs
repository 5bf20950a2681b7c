//! HTTP API layer: authenticated, role-checked handlers that delegate to
//! the workflow engine in `sowgate-core`.

mod auth;
mod error;
mod handlers;

pub use auth::CurrentUser;
pub use error::ApiError;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use sowgate_core::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

pub fn create_router(db: Database) -> Router {
    Router::new()
        .route("/api/sows", get(handlers::list_sows).post(handlers::create_sow))
        .route("/api/sows/{id}", get(handlers::get_sow))
        .route("/api/sows/{id}/submit", post(handlers::submit_sow))
        .route("/api/sows/{id}/ops-approve", post(handlers::ops_approve))
        .route("/api/sows/{id}/supplier-accept", post(handlers::supplier_accept))
        .route("/api/sows/{id}/supplier-reject", post(handlers::supplier_reject))
        .route("/api/sows/{id}/financial-approve", post(handlers::financial_approve))
        .route("/api/sows/{id}/financial-reject", post(handlers::financial_reject))
        .route("/api/sows/{id}/eligible-approvers", get(handlers::eligible_approvers))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { db })
}
