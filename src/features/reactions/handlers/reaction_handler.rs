use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::reactions::dtos::{
    ReactDto, ReactionTotalsResponseDto, VoteDto, VoteResponseDto,
};
use crate::features::reactions::services::ReactionService;
use crate::shared::types::ApiResponse;

/// React to an approved submission
///
/// One active reaction per voter: repeating it is a no-op, a different kind replaces it.
#[utoipa::path(
    post,
    path = "/api/react",
    request_body = ReactDto,
    responses(
        (status = 200, description = "Fresh reaction totals", body = ApiResponse<ReactionTotalsResponseDto>),
        (status = 400, description = "Invalid reaction or missing voter"),
        (status = 404, description = "Submission not found")
    ),
    tag = "reactions"
)]
pub async fn react(
    State(service): State<Arc<ReactionService>>,
    AppJson(dto): AppJson<ReactDto>,
) -> Result<Json<ApiResponse<ReactionTotalsResponseDto>>> {
    let totals = service.react(dto).await?;
    Ok(Json(ApiResponse::success(
        Some(ReactionTotalsResponseDto { totals }),
        None,
        None,
    )))
}

/// Legacy upvote, counted once per voter
#[utoipa::path(
    post,
    path = "/api/vote",
    request_body = VoteDto,
    responses(
        (status = 200, description = "Current score", body = ApiResponse<VoteResponseDto>),
        (status = 400, description = "Missing voter"),
        (status = 404, description = "Submission not found")
    ),
    tag = "reactions"
)]
pub async fn vote(
    State(service): State<Arc<ReactionService>>,
    AppJson(dto): AppJson<VoteDto>,
) -> Result<Json<ApiResponse<VoteResponseDto>>> {
    let response = service.vote(dto).await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Reaction totals of an approved submission
#[utoipa::path(
    get,
    path = "/api/reaction-totals/{id}",
    params(
        ("id" = Uuid, Path, description = "Submission id")
    ),
    responses(
        (status = 200, description = "Reaction totals", body = ApiResponse<ReactionTotalsResponseDto>),
        (status = 404, description = "Submission not found")
    ),
    tag = "reactions"
)]
pub async fn get_totals(
    State(service): State<Arc<ReactionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReactionTotalsResponseDto>>> {
    let totals = service.totals(id).await?;
    Ok(Json(ApiResponse::success(
        Some(ReactionTotalsResponseDto { totals }),
        None,
        None,
    )))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use uuid::Uuid;

    use crate::features::submissions::models::SubmissionStatus;
    use crate::shared::test_helpers::{seed_submission, test_app};

    #[tokio::test]
    async fn test_same_reaction_twice_counts_once() {
        let app = test_app();
        let submission = seed_submission(&app.store, SubmissionStatus::Approved).await;

        for _ in 0..2 {
            app.server
                .post("/api/react")
                .json(&json!({ "id": submission.id, "voter": "v1", "reaction": "like" }))
                .await
                .assert_status_ok();
        }

        let body: Value = app
            .server
            .get(&format!("/api/reaction-totals/{}", submission.id))
            .await
            .json();
        assert_eq!(body["data"]["totals"]["like_count"], 1);
    }

    #[tokio::test]
    async fn test_new_reaction_replaces_previous() {
        let app = test_app();
        let submission = seed_submission(&app.store, SubmissionStatus::Approved).await;

        app.server
            .post("/api/react")
            .json(&json!({ "id": submission.id, "voter": "v1", "reaction": "like" }))
            .await
            .assert_status_ok();

        let body: Value = app
            .server
            .post("/api/react")
            .json(&json!({ "id": submission.id, "voter": "v1", "reaction": "wow" }))
            .await
            .json();

        let totals = &body["data"]["totals"];
        assert_eq!(totals["like_count"], 0);
        assert_eq!(totals["wow_count"], 1);
    }

    #[tokio::test]
    async fn test_two_voters_count_twice() {
        let app = test_app();
        let submission = seed_submission(&app.store, SubmissionStatus::Approved).await;

        for voter in ["v1", "v2"] {
            app.server
                .post("/api/react")
                .json(&json!({ "id": submission.id, "voter": voter, "reaction": "like" }))
                .await
                .assert_status_ok();
        }

        let body: Value = app
            .server
            .get(&format!("/api/reaction-totals/{}", submission.id))
            .await
            .json();
        assert_eq!(body["data"]["totals"]["like_count"], 2);
    }

    #[tokio::test]
    async fn test_invalid_reaction_and_missing_voter() {
        let app = test_app();
        let submission = seed_submission(&app.store, SubmissionStatus::Approved).await;

        app.server
            .post("/api/react")
            .json(&json!({ "id": submission.id, "voter": "v1", "reaction": "love" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        app.server
            .post("/api/react")
            .json(&json!({ "id": submission.id, "reaction": "like" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_react_on_unknown_or_pending_submission() {
        let app = test_app();
        let pending = seed_submission(&app.store, SubmissionStatus::Pending).await;

        for id in [Uuid::new_v4(), pending.id] {
            app.server
                .post("/api/react")
                .json(&json!({ "id": id, "voter": "v1", "reaction": "like" }))
                .await
                .assert_status(StatusCode::NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn test_vote_counts_once_per_voter() {
        let app = test_app();
        let submission = seed_submission(&app.store, SubmissionStatus::Approved).await;

        let first: Value = app
            .server
            .post("/api/vote")
            .json(&json!({ "id": submission.id, "voter": "v1" }))
            .await
            .json();
        assert_eq!(first["data"]["score"], 1);
        assert_eq!(first["data"]["counted"], true);

        let second: Value = app
            .server
            .post("/api/vote")
            .json(&json!({ "id": submission.id, "voter": "v1" }))
            .await
            .json();
        assert_eq!(second["data"]["score"], 1);
        assert_eq!(second["data"]["counted"], false);
    }

    #[tokio::test]
    async fn test_vote_keeps_existing_reaction() {
        let app = test_app();
        let submission = seed_submission(&app.store, SubmissionStatus::Approved).await;

        app.server
            .post("/api/react")
            .json(&json!({ "id": submission.id, "voter": "v1", "reaction": "sad" }))
            .await
            .assert_status_ok();

        let vote: Value = app
            .server
            .post("/api/vote")
            .json(&json!({ "id": submission.id, "voter": "v1" }))
            .await
            .json();
        assert_eq!(vote["data"]["counted"], false);
        assert_eq!(vote["data"]["score"], 0);
    }
}
