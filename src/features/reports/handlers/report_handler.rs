use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::reports::dtos::CreateReportDto;
use crate::features::reports::services::ReportService;
use crate::shared::types::ApiResponse;
use crate::shared::validation::validation_error;

/// Report an approved submission to the moderators
#[utoipa::path(
    post,
    path = "/api/report",
    request_body = CreateReportDto,
    responses(
        (status = 200, description = "Report recorded"),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Submission not found"),
        (status = 409, description = "Voter already reported this submission"),
        (status = 429, description = "Too many reports in the last hour")
    ),
    tag = "reports"
)]
pub async fn create_report(
    State(service): State<Arc<ReportService>>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<Json<ApiResponse<()>>> {
    let dto = dto.normalized();
    dto.validate().map_err(validation_error)?;

    service.report(dto).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Gracias, revisaremos la publicación.".to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::core::config::LedgerConfig;
    use crate::features::submissions::models::SubmissionStatus;
    use crate::modules::store::BoardStore;
    use crate::shared::test_helpers::{admin_header, seed_submission, test_app, test_app_with};
    use crate::shared::validation::ContentFilter;

    #[tokio::test]
    async fn test_duplicate_report_conflicts_and_counts_once() {
        let app = test_app();
        let submission = seed_submission(&app.store, SubmissionStatus::Approved).await;
        let payload = json!({
            "submissionId": submission.id,
            "reason": "Es información falsa",
            "voter": "v1"
        });

        let first = app.server.post("/api/report").json(&payload).await;
        first.assert_status_ok();
        assert_eq!(first.json::<Value>()["ok"], true);

        let second = app.server.post("/api/report").json(&payload).await;
        second.assert_status(StatusCode::CONFLICT);
        assert_eq!(second.json::<Value>()["error"], "Ya reportaste esta publicación");

        let stored = app.store.find_submission(submission.id).await.unwrap().unwrap();
        assert_eq!(stored.report_count, 1);
    }

    #[tokio::test]
    async fn test_rate_limit_applies_across_submissions() {
        let app = test_app_with(
            LedgerConfig {
                report_rate_limit_per_hour: 2,
                report_flag_threshold: 0,
            },
            ContentFilter::default(),
        );

        let mut statuses = Vec::new();
        for _ in 0..3 {
            let submission = seed_submission(&app.store, SubmissionStatus::Approved).await;
            let response = app
                .server
                .post("/api/report")
                .json(&json!({
                    "submissionId": submission.id,
                    "reason": "Difama a un vecino",
                    "voter": "v1"
                }))
                .await;
            statuses.push(response.status_code());
        }

        assert_eq!(
            statuses,
            vec![StatusCode::OK, StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]
        );
    }

    #[tokio::test]
    async fn test_threshold_hides_submission_from_feed() {
        let app = test_app_with(
            LedgerConfig {
                report_rate_limit_per_hour: 5,
                report_flag_threshold: 2,
            },
            ContentFilter::default(),
        );
        let submission = seed_submission(&app.store, SubmissionStatus::Approved).await;

        for voter in ["v1", "v2"] {
            app.server
                .post("/api/report")
                .json(&json!({
                    "submissionId": submission.id,
                    "reason": "Contenido ofensivo",
                    "voter": voter
                }))
                .await
                .assert_status_ok();
        }

        let feed: Value = app.server.get("/api/list").await.json();
        assert!(feed["data"].as_array().unwrap().is_empty());

        let (name, value) = admin_header();
        let flagged: Value = app
            .server
            .get("/api/moderation/flagged")
            .add_header(name, value)
            .await
            .json();
        let items = flagged["data"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["report_count"], 2);
        assert_eq!(items[0]["flagged"], true);
    }

    #[tokio::test]
    async fn test_report_validation() {
        let app = test_app();
        let submission = seed_submission(&app.store, SubmissionStatus::Approved).await;

        app.server
            .post("/api/report")
            .json(&json!({ "submissionId": submission.id, "reason": "no", "voter": "v1" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        app.server
            .post("/api/report")
            .json(&json!({ "submissionId": submission.id, "reason": "Es falso" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_report_on_pending_submission_is_not_found() {
        let app = test_app();
        let submission = seed_submission(&app.store, SubmissionStatus::Pending).await;

        app.server
            .post("/api/report")
            .json(&json!({
                "submissionId": submission.id,
                "reason": "Es falso",
                "voter": "v1"
            }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
