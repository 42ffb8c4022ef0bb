use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::submissions::models::{Category, Submission, SubmissionStatus};
use crate::shared::validation::trim_to_option;

/// Request DTO for a new post
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct CreateSubmissionDto {
    /// `RUMOR` or `REPORTE`
    #[schema(example = "RUMOR")]
    pub category: String,

    #[validate(length(
        min = 5,
        max = 80,
        message = "El título debe tener entre 5 y 80 caracteres."
    ))]
    pub title: String,

    #[validate(length(
        min = 12,
        max = 400,
        message = "El texto debe tener entre 12 y 400 caracteres."
    ))]
    pub content: String,

    /// Neighborhood label
    #[validate(length(max = 60, message = "El barrio no debe exceder 60 caracteres."))]
    pub barrio: Option<String>,

    #[validate(url(message = "La URL de la imagen no es válida."))]
    pub imagen_url: Option<String>,
}

impl CreateSubmissionDto {
    /// Trim every field and drop empty optionals before validation
    pub fn normalized(self) -> Self {
        Self {
            category: self.category.trim().to_string(),
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            barrio: trim_to_option(self.barrio),
            imagen_url: trim_to_option(self.imagen_url),
        }
    }
}

/// Response DTO for a created post
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitResponseDto {
    pub id: Uuid,
    pub status: SubmissionStatus,
}

/// Full submission as seen by moderators
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionResponseDto {
    pub id: Uuid,
    pub category: Category,
    pub title: String,
    pub content: String,
    pub barrio: Option<String>,
    pub imagen_url: Option<String>,
    pub status: SubmissionStatus,
    pub rejection_reason: Option<String>,
    pub flagged: bool,
    pub report_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Submission> for SubmissionResponseDto {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            category: s.category,
            title: s.title,
            content: s.content,
            barrio: s.barrio,
            imagen_url: s.imagen_url,
            status: s.status,
            rejection_reason: s.rejection_reason,
            flagged: s.flagged,
            report_count: s.report_count,
            created_at: s.created_at,
        }
    }
}
