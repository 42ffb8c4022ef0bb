use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::core::middleware::ADMIN_KEY_HEADER;
use crate::features::ai_images::{
    dtos as ai_images_dtos, handlers as ai_images_handlers, models as ai_images_models,
};
use crate::features::comments::{dtos as comments_dtos, handlers as comments_handlers};
use crate::features::feed::{dtos as feed_dtos, handlers as feed_handlers};
use crate::features::moderation::{dtos as moderation_dtos, handlers as moderation_handlers};
use crate::features::reactions::{
    dtos as reactions_dtos, handlers as reactions_handlers, models as reactions_models,
};
use crate::features::reports::{dtos as reports_dtos, handlers as reports_handlers};
use crate::features::submissions::{
    dtos as submissions_dtos, handlers as submissions_handlers, models as submissions_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Submissions (public)
        submissions_handlers::submit,
        // Feed (public)
        feed_handlers::list_feed,
        feed_handlers::list_top,
        // Reactions (public)
        reactions_handlers::react,
        reactions_handlers::vote,
        reactions_handlers::get_totals,
        // Reports (public)
        reports_handlers::create_report,
        // Comments (public)
        comments_handlers::list_comments,
        comments_handlers::create_comment,
        // Moderation (admin key)
        moderation_handlers::moderate,
        moderation_handlers::list_pending,
        moderation_handlers::list_flagged,
        moderation_handlers::list_reports,
        moderation_handlers::discord_ping,
        // AI images (queue token)
        ai_images_handlers::generate_image,
        ai_images_handlers::list_queue,
        ai_images_handlers::approve_image,
        ai_images_handlers::reject_image,
        ai_images_handlers::top_of_day,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Submissions
            submissions_models::Category,
            submissions_models::SubmissionStatus,
            submissions_dtos::CreateSubmissionDto,
            submissions_dtos::SubmitResponseDto,
            submissions_dtos::SubmissionResponseDto,
            ApiResponse<submissions_dtos::SubmitResponseDto>,
            ApiResponse<Vec<submissions_dtos::SubmissionResponseDto>>,
            // Feed
            feed_dtos::FeedItemDto,
            ApiResponse<Vec<feed_dtos::FeedItemDto>>,
            // Reactions
            reactions_models::ReactionKind,
            reactions_models::ReactionTotals,
            reactions_dtos::ReactDto,
            reactions_dtos::VoteDto,
            reactions_dtos::ReactionTotalsResponseDto,
            reactions_dtos::VoteResponseDto,
            ApiResponse<reactions_dtos::ReactionTotalsResponseDto>,
            ApiResponse<reactions_dtos::VoteResponseDto>,
            // Reports
            reports_dtos::CreateReportDto,
            reports_dtos::ReportResponseDto,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            // Comments
            comments_dtos::CreateCommentDto,
            comments_dtos::CommentResponseDto,
            ApiResponse<comments_dtos::CommentResponseDto>,
            ApiResponse<Vec<comments_dtos::CommentResponseDto>>,
            // Moderation
            moderation_dtos::ModerateDto,
            moderation_dtos::ModerateResponseDto,
            moderation_dtos::DiscordPingResponseDto,
            ApiResponse<moderation_dtos::ModerateResponseDto>,
            ApiResponse<moderation_dtos::DiscordPingResponseDto>,
            // AI images
            ai_images_models::AiImageStatus,
            ai_images_dtos::GenerateImageDto,
            ai_images_dtos::ReviewImageDto,
            ai_images_dtos::AiImageResponseDto,
            ApiResponse<ai_images_dtos::AiImageResponseDto>,
            ApiResponse<Vec<ai_images_dtos::AiImageResponseDto>>,
        )
    ),
    tags(
        (name = "submissions", description = "Anonymous rumors and citizen reports (public)"),
        (name = "feed", description = "Approved submissions with their counters (public)"),
        (name = "reactions", description = "Reaction ledger and legacy upvote (public)"),
        (name = "reports", description = "Abuse reports (public, rate limited)"),
        (name = "comments", description = "Anonymous comments (public)"),
        (name = "moderation", description = "Moderator tools (x-admin-key)"),
        (name = "ai-images", description = "AI illustration review queue (bearer token)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Costachisme API",
        version = "0.1.0",
        description = "API documentation for Costachisme",
    )
)]
pub struct ApiDoc;

/// Registers the moderator key and the image queue token
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "admin_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(ADMIN_KEY_HEADER))),
            );
            components.add_security_scheme(
                "queue_token",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
