use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::ai_images::dtos::{AiImageResponseDto, GenerateImageDto, ReviewImageDto};
use crate::features::ai_images::services::AiImageService;
use crate::shared::types::ApiResponse;
use crate::shared::validation::validation_error;

/// Generate an illustration for a submission and queue it for review
#[utoipa::path(
    post,
    path = "/api/ai-images/generate",
    request_body = GenerateImageDto,
    responses(
        (status = 201, description = "Image queued", body = ApiResponse<AiImageResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or wrong bearer token"),
        (status = 404, description = "Submission not found"),
        (status = 502, description = "Image service failed or is not configured")
    ),
    security(("queue_token" = [])),
    tag = "ai-images"
)]
pub async fn generate_image(
    State(service): State<Arc<AiImageService>>,
    AppJson(dto): AppJson<GenerateImageDto>,
) -> Result<(StatusCode, Json<ApiResponse<AiImageResponseDto>>)> {
    let dto = dto.normalized();
    dto.validate().map_err(validation_error)?;

    let image = service.generate(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(image), None, None)),
    ))
}

/// Images waiting for review
#[utoipa::path(
    get,
    path = "/api/ai-images/queue",
    responses(
        (status = 200, description = "Pending images", body = ApiResponse<Vec<AiImageResponseDto>>),
        (status = 401, description = "Missing or wrong bearer token")
    ),
    security(("queue_token" = [])),
    tag = "ai-images"
)]
pub async fn list_queue(
    State(service): State<Arc<AiImageService>>,
) -> Result<Json<ApiResponse<Vec<AiImageResponseDto>>>> {
    let images = service.list_queue().await?;
    Ok(Json(ApiResponse::list(images)))
}

/// Approve an image and attach it to its submission
#[utoipa::path(
    post,
    path = "/api/ai-images/approve",
    request_body = ReviewImageDto,
    responses(
        (status = 200, description = "Image approved", body = ApiResponse<AiImageResponseDto>),
        (status = 401, description = "Missing or wrong bearer token"),
        (status = 404, description = "Image not found"),
        (status = 409, description = "Image already rejected")
    ),
    security(("queue_token" = [])),
    tag = "ai-images"
)]
pub async fn approve_image(
    State(service): State<Arc<AiImageService>>,
    AppJson(dto): AppJson<ReviewImageDto>,
) -> Result<Json<ApiResponse<AiImageResponseDto>>> {
    let image = service.approve(dto.normalized()).await?;
    Ok(Json(ApiResponse::success(Some(image), None, None)))
}

/// Reject an image
#[utoipa::path(
    post,
    path = "/api/ai-images/reject",
    request_body = ReviewImageDto,
    responses(
        (status = 200, description = "Image rejected", body = ApiResponse<AiImageResponseDto>),
        (status = 401, description = "Missing or wrong bearer token"),
        (status = 404, description = "Image not found"),
        (status = 409, description = "Image already approved")
    ),
    security(("queue_token" = [])),
    tag = "ai-images"
)]
pub async fn reject_image(
    State(service): State<Arc<AiImageService>>,
    AppJson(dto): AppJson<ReviewImageDto>,
) -> Result<Json<ApiResponse<AiImageResponseDto>>> {
    let image = service.reject(dto).await?;
    Ok(Json(ApiResponse::success(Some(image), None, None)))
}

/// Illustrate yesterday's best scored post
#[utoipa::path(
    post,
    path = "/api/ai-images/top-of-day",
    responses(
        (status = 200, description = "Image queued, or no posts yesterday", body = ApiResponse<AiImageResponseDto>),
        (status = 401, description = "Missing or wrong bearer token"),
        (status = 502, description = "Image service failed or is not configured")
    ),
    security(("queue_token" = [])),
    tag = "ai-images"
)]
pub async fn top_of_day(
    State(service): State<Arc<AiImageService>>,
) -> Result<Json<ApiResponse<AiImageResponseDto>>> {
    let response = match service.top_of_day().await? {
        Some(image) => ApiResponse::success(Some(image), None, None),
        None => ApiResponse::success(None, Some("No hubo publicaciones ayer".to_string()), None),
    };
    Ok(Json(response))
}
