use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::feed::dtos::{FeedItemDto, FeedQueryParams};
use crate::features::feed::services::FeedService;
use crate::shared::types::ApiResponse;

/// Public feed of approved submissions
#[utoipa::path(
    get,
    path = "/api/list",
    params(FeedQueryParams),
    responses(
        (status = 200, description = "Feed", body = ApiResponse<Vec<FeedItemDto>>),
        (status = 400, description = "Invalid sort or category")
    ),
    tag = "feed"
)]
pub async fn list_feed(
    State(service): State<Arc<FeedService>>,
    AppQuery(params): AppQuery<FeedQueryParams>,
) -> Result<Json<ApiResponse<Vec<FeedItemDto>>>> {
    let items = service.list_approved(params).await?;
    Ok(Json(ApiResponse::list(items)))
}

/// Best scored submissions of the last 30 days
#[utoipa::path(
    get,
    path = "/api/top",
    responses(
        (status = 200, description = "Top submissions", body = ApiResponse<Vec<FeedItemDto>>)
    ),
    tag = "feed"
)]
pub async fn list_top(
    State(service): State<Arc<FeedService>>,
) -> Result<Json<ApiResponse<Vec<FeedItemDto>>>> {
    let items = service.list_top().await?;
    Ok(Json(ApiResponse::list(items)))
}
