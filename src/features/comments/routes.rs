use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::comments::handlers;
use crate::features::comments::services::CommentService;

pub fn routes(service: Arc<CommentService>) -> Router {
    Router::new()
        .route(
            "/api/comments/{submission_id}",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .with_state(service)
}
