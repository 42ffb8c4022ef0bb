use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::reactions::handlers;
use crate::features::reactions::services::ReactionService;

pub fn routes(service: Arc<ReactionService>) -> Router {
    Router::new()
        .route("/api/react", post(handlers::react))
        .route("/api/vote", post(handlers::vote))
        .route("/api/reaction-totals/{id}", get(handlers::get_totals))
        .with_state(service)
}
