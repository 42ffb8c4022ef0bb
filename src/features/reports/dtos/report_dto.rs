use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::reports::models::Report;

/// Request DTO for reporting a submission
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReportDto {
    #[serde(rename = "submissionId")]
    pub submission_id: Uuid,

    #[serde(default)]
    #[validate(length(
        min = 3,
        max = 300,
        message = "El motivo debe tener entre 3 y 300 caracteres."
    ))]
    pub reason: String,

    #[serde(default)]
    pub voter: String,
}

impl CreateReportDto {
    pub fn normalized(self) -> Self {
        Self {
            reason: self.reason.trim().to_string(),
            ..self
        }
    }
}

/// Report entry as seen by moderators
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub voter: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            submission_id: r.submission_id,
            voter: r.voter,
            reason: r.reason,
            created_at: r.created_at,
        }
    }
}
