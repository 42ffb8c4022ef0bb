use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::comments::dtos::{CommentListQuery, CommentResponseDto, CreateCommentDto};
use crate::features::comments::services::CommentService;
use crate::shared::types::ApiResponse;
use crate::shared::validation::validation_error;

/// List comments of an approved submission, newest first
#[utoipa::path(
    get,
    path = "/api/comments/{submission_id}",
    params(
        ("submission_id" = Uuid, Path, description = "Submission id"),
        CommentListQuery
    ),
    responses(
        (status = 200, description = "Comments", body = ApiResponse<Vec<CommentResponseDto>>),
        (status = 404, description = "Submission not found")
    ),
    tag = "comments"
)]
pub async fn list_comments(
    State(service): State<Arc<CommentService>>,
    Path(submission_id): Path<Uuid>,
    AppQuery(query): AppQuery<CommentListQuery>,
) -> Result<Json<ApiResponse<Vec<CommentResponseDto>>>> {
    let comments = service
        .list(submission_id, query.effective_limit())
        .await?;
    Ok(Json(ApiResponse::list(comments)))
}

/// Comment anonymously on an approved submission
#[utoipa::path(
    post,
    path = "/api/comments/{submission_id}",
    params(
        ("submission_id" = Uuid, Path, description = "Submission id")
    ),
    request_body = CreateCommentDto,
    responses(
        (status = 201, description = "Comment created", body = ApiResponse<CommentResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Submission not found")
    ),
    tag = "comments"
)]
pub async fn create_comment(
    State(service): State<Arc<CommentService>>,
    Path(submission_id): Path<Uuid>,
    AppJson(dto): AppJson<CreateCommentDto>,
) -> Result<(StatusCode, Json<ApiResponse<CommentResponseDto>>)> {
    let dto = dto.normalized();
    dto.validate().map_err(validation_error)?;

    let comment = service.add(submission_id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(comment), None, None)),
    ))
}
