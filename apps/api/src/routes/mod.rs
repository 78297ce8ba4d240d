pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::pipeline::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/resumes/format", post(handlers::handle_format))
        .layer(body_limit)
        .with_state(state)
}
