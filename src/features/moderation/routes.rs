use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::core::middleware::{admin_key_middleware, SharedSecret};
use crate::features::moderation::handlers;
use crate::features::moderation::services::ModerationService;

/// Moderator routes, all behind the `x-admin-key` check
pub fn routes(service: Arc<ModerationService>, admin_key: Arc<SharedSecret>) -> Router {
    Router::new()
        .route("/api/moderate", post(handlers::moderate))
        .route("/api/moderation/pending", get(handlers::list_pending))
        .route("/api/moderation/flagged", get(handlers::list_flagged))
        .route(
            "/api/moderation/submissions/{id}/reports",
            get(handlers::list_reports),
        )
        .route("/api/moderation/discord-ping", get(handlers::discord_ping))
        .route_layer(middleware::from_fn_with_state(
            admin_key,
            admin_key_middleware,
        ))
        .with_state(service)
}
