use axum::{routing::post, Router};
use std::sync::Arc;

use crate::features::submissions::handlers;
use crate::features::submissions::services::SubmissionService;

pub fn routes(service: Arc<SubmissionService>) -> Router {
    Router::new()
        .route("/api/submit", post(handlers::submit))
        .with_state(service)
}
