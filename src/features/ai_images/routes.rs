use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::core::middleware::{queue_token_middleware, SharedSecret};
use crate::features::ai_images::handlers;
use crate::features::ai_images::services::AiImageService;

/// Image queue routes, all behind the bearer token check
pub fn routes(service: Arc<AiImageService>, queue_token: Arc<SharedSecret>) -> Router {
    Router::new()
        .route("/api/ai-images/generate", post(handlers::generate_image))
        .route("/api/ai-images/queue", get(handlers::list_queue))
        .route("/api/ai-images/approve", post(handlers::approve_image))
        .route("/api/ai-images/reject", post(handlers::reject_image))
        .route("/api/ai-images/top-of-day", post(handlers::top_of_day))
        .route_layer(middleware::from_fn_with_state(
            queue_token,
            queue_token_middleware,
        ))
        .with_state(service)
}
