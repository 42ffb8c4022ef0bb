use axum::{http::StatusCode, routing::get, Router};
use std::sync::Arc;

use crate::core::config::LedgerConfig;
use crate::core::middleware::SharedSecret;
use crate::features::ai_images::{routes as ai_images_routes, AiImageService};
use crate::features::comments::{routes as comments_routes, CommentService};
use crate::features::feed::{routes as feed_routes, FeedService};
use crate::features::moderation::{routes as moderation_routes, ModerationService};
use crate::features::reactions::{routes as reactions_routes, ReactionService};
use crate::features::reports::{models::ReportPolicy, routes as reports_routes, ReportService};
use crate::features::submissions::{routes as submissions_routes, SubmissionService};
use crate::modules::image_gen::ImageGenerator;
use crate::modules::notifier::DiscordNotifier;
use crate::modules::storage::PublicObjectStore;
use crate::modules::store::BoardStore;
use crate::shared::validation::ContentFilter;

/// Adapters and settings every service is built from
pub struct AppDeps {
    pub store: Arc<dyn BoardStore>,
    pub filter: ContentFilter,
    pub notifier: DiscordNotifier,
    pub ledger: LedgerConfig,
    pub image_generator: Option<Arc<dyn ImageGenerator>>,
    pub image_store: Option<Arc<dyn PublicObjectStore>>,
    pub admin_key: SharedSecret,
    pub queue_token: SharedSecret,
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// All API routes plus `/health`, without docs or transport layers
pub fn api_router(deps: AppDeps) -> Router {
    let AppDeps {
        store,
        filter,
        notifier,
        ledger,
        image_generator,
        image_store,
        admin_key,
        queue_token,
    } = deps;

    let submission_service = Arc::new(SubmissionService::new(
        Arc::clone(&store),
        filter.clone(),
        notifier.clone(),
    ));
    let reaction_service = Arc::new(ReactionService::new(Arc::clone(&store)));
    let report_service = Arc::new(ReportService::new(
        Arc::clone(&store),
        ReportPolicy::from(ledger),
    ));
    let comment_service = Arc::new(CommentService::new(Arc::clone(&store), filter));
    let feed_service = Arc::new(FeedService::new(Arc::clone(&store)));
    let moderation_service = Arc::new(ModerationService::new(Arc::clone(&store), notifier));
    let ai_image_service = Arc::new(AiImageService::new(store, image_generator, image_store));
    tracing::info!("Board services initialized");

    Router::new()
        .merge(submissions_routes::routes(submission_service))
        .merge(reactions_routes::routes(reaction_service))
        .merge(reports_routes::routes(report_service))
        .merge(comments_routes::routes(comment_service))
        .merge(feed_routes::routes(feed_service))
        .merge(moderation_routes::routes(
            moderation_service,
            Arc::new(admin_key),
        ))
        .merge(ai_images_routes::routes(
            ai_image_service,
            Arc::new(queue_token),
        ))
        .route("/health", get(health_check))
}
