use axum::{routing::post, Router};
use std::sync::Arc;

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

pub fn routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route("/api/report", post(handlers::create_report))
        .with_state(service)
}
