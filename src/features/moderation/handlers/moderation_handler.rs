use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::moderation::dtos::{DiscordPingResponseDto, ModerateDto, ModerateResponseDto};
use crate::features::moderation::services::ModerationService;
use crate::features::reports::dtos::ReportResponseDto;
use crate::features::submissions::dtos::SubmissionResponseDto;
use crate::shared::types::ApiResponse;
use crate::shared::validation::validation_error;

/// Approve, reject or delete a submission
#[utoipa::path(
    post,
    path = "/api/moderate",
    request_body = ModerateDto,
    responses(
        (status = 200, description = "Decision applied", body = ApiResponse<ModerateResponseDto>),
        (status = 400, description = "Invalid action"),
        (status = 401, description = "Missing or wrong admin key"),
        (status = 404, description = "Submission not found"),
        (status = 409, description = "Submission already in the opposite state")
    ),
    security(("admin_key" = [])),
    tag = "moderation"
)]
pub async fn moderate(
    State(service): State<Arc<ModerationService>>,
    AppJson(dto): AppJson<ModerateDto>,
) -> Result<Json<ApiResponse<ModerateResponseDto>>> {
    let dto = dto.normalized();
    dto.validate().map_err(validation_error)?;

    let response = service.moderate(dto).await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Submissions waiting for a decision, newest first
#[utoipa::path(
    get,
    path = "/api/moderation/pending",
    responses(
        (status = 200, description = "Pending submissions", body = ApiResponse<Vec<SubmissionResponseDto>>),
        (status = 401, description = "Missing or wrong admin key")
    ),
    security(("admin_key" = [])),
    tag = "moderation"
)]
pub async fn list_pending(
    State(service): State<Arc<ModerationService>>,
) -> Result<Json<ApiResponse<Vec<SubmissionResponseDto>>>> {
    let items = service.list_pending().await?;
    Ok(Json(ApiResponse::list(items)))
}

/// Approved submissions hidden by reports
#[utoipa::path(
    get,
    path = "/api/moderation/flagged",
    responses(
        (status = 200, description = "Flagged submissions", body = ApiResponse<Vec<SubmissionResponseDto>>),
        (status = 401, description = "Missing or wrong admin key")
    ),
    security(("admin_key" = [])),
    tag = "moderation"
)]
pub async fn list_flagged(
    State(service): State<Arc<ModerationService>>,
) -> Result<Json<ApiResponse<Vec<SubmissionResponseDto>>>> {
    let items = service.list_flagged().await?;
    Ok(Json(ApiResponse::list(items)))
}

/// Reports filed against a submission
#[utoipa::path(
    get,
    path = "/api/moderation/submissions/{id}/reports",
    params(
        ("id" = Uuid, Path, description = "Submission id")
    ),
    responses(
        (status = 200, description = "Reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "Missing or wrong admin key"),
        (status = 404, description = "Submission not found")
    ),
    security(("admin_key" = [])),
    tag = "moderation"
)]
pub async fn list_reports(
    State(service): State<Arc<ModerationService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let items = service.list_reports(id).await?;
    Ok(Json(ApiResponse::list(items)))
}

/// Send a test message to the Discord webhook
#[utoipa::path(
    get,
    path = "/api/moderation/discord-ping",
    responses(
        (status = 200, description = "Discord answer", body = ApiResponse<DiscordPingResponseDto>),
        (status = 401, description = "Missing or wrong admin key"),
        (status = 502, description = "Webhook missing or failing")
    ),
    security(("admin_key" = [])),
    tag = "moderation"
)]
pub async fn discord_ping(
    State(service): State<Arc<ModerationService>>,
) -> Result<Json<ApiResponse<DiscordPingResponseDto>>> {
    let response = service.discord_ping().await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}
