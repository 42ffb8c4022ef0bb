use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::feed::handlers;
use crate::features::feed::services::FeedService;

pub fn routes(service: Arc<FeedService>) -> Router {
    Router::new()
        .route("/api/list", get(handlers::list_feed))
        .route("/api/top", get(handlers::list_top))
        .with_state(service)
}
