pub mod health;
pub mod resume;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/resume/parse", post(resume::handle_parse))
        .route("/api/v1/resume/compare", post(resume::handle_compare))
        .route("/api/v1/resume/keywords", post(resume::handle_keywords))
        .route("/api/v1/resume/optimize", post(resume::handle_optimize))
        .route("/api/v1/resume/export", post(resume::handle_export))
        .route("/api/v1/resume/:key", get(resume::handle_get_stored))
        .with_state(state)
}
