pub mod dashboard;
pub mod health;
pub mod resumes;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/resumes",
            post(resumes::handle_upload).get(resumes::handle_search),
        )
        .route("/api/v1/resumes/:id", get(resumes::handle_get))
        .route("/api/v1/resumes/:id/report", get(resumes::handle_report))
        .route("/api/v1/dashboard", get(dashboard::handle_dashboard))
        .layer(body_limit)
        .with_state(state)
}
