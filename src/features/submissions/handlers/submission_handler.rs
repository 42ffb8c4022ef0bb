use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::submissions::dtos::{CreateSubmissionDto, SubmitResponseDto};
use crate::features::submissions::services::SubmissionService;
use crate::shared::types::ApiResponse;
use crate::shared::validation::validation_error;

/// Submit a rumor or citizen report for moderation
#[utoipa::path(
    post,
    path = "/api/submit",
    request_body = CreateSubmissionDto,
    responses(
        (status = 201, description = "Submission stored as pending", body = ApiResponse<SubmitResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "submissions"
)]
pub async fn submit(
    State(service): State<Arc<SubmissionService>>,
    AppJson(dto): AppJson<CreateSubmissionDto>,
) -> Result<(StatusCode, Json<ApiResponse<SubmitResponseDto>>)> {
    let dto = dto.normalized();
    dto.validate().map_err(validation_error)?;

    let response = service.submit(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(response),
            Some("Gracias, tu publicación será revisada.".to_string()),
            None,
        )),
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::shared::test_helpers::{admin_header, fake_content, fake_title, test_app};

    #[tokio::test]
    async fn test_submit_starts_pending_and_hidden() {
        let app = test_app();

        let response = app
            .server
            .post("/api/submit")
            .json(&json!({
                "category": "RUMOR",
                "title": fake_title(),
                "content": fake_content(),
                "barrio": "Centro"
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        assert_eq!(body["ok"], true);
        assert_eq!(body["data"]["status"], "pending");

        let feed: Value = app.server.get("/api/list").await.json();
        assert_eq!(feed["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_approved_submission_shows_zero_counters() {
        let app = test_app();

        let created: Value = app
            .server
            .post("/api/submit")
            .json(&json!({
                "category": "REPORTE",
                "title": fake_title(),
                "content": fake_content()
            }))
            .await
            .json();
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let (name, value) = admin_header();
        app.server
            .post("/api/moderate")
            .add_header(name, value)
            .json(&json!({ "id": id, "action": "approve" }))
            .await
            .assert_status_ok();

        let feed: Value = app.server.get("/api/list").await.json();
        let items = feed["data"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], id.as_str());
        for key in [
            "like_count",
            "dislike_count",
            "haha_count",
            "wow_count",
            "angry_count",
            "sad_count",
            "comment_count",
            "score",
        ] {
            assert_eq!(items[0][key], 0, "{} should start at zero", key);
        }
    }

    #[tokio::test]
    async fn test_submit_rejects_short_title() {
        let app = test_app();

        let response = app
            .server
            .post("/api/submit")
            .json(&json!({
                "category": "RUMOR",
                "title": "Hola",
                "content": fake_content()
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "El título debe tener entre 5 y 80 caracteres.");
    }

    #[tokio::test]
    async fn test_submit_rejects_unknown_category() {
        let app = test_app();

        let response = app
            .server
            .post("/api/submit")
            .json(&json!({
                "category": "CHISME",
                "title": fake_title(),
                "content": fake_content()
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_submit_rejects_phone_numbers() {
        let app = test_app();

        let response = app
            .server
            .post("/api/submit")
            .json(&json!({
                "category": "RUMOR",
                "title": fake_title(),
                "content": "Llamen a Don Pepe al 55 1234 5678 para más"
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
