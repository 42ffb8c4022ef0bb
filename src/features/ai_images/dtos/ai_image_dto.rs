use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::ai_images::models::{AiImage, AiImageStatus};
use crate::shared::validation::trim_to_option;

/// Request DTO for generating an illustration
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct GenerateImageDto {
    #[serde(rename = "submissionId")]
    pub submission_id: Uuid,

    #[serde(default)]
    #[validate(length(
        min = 3,
        max = 500,
        message = "El prompt debe tener entre 3 y 500 caracteres."
    ))]
    pub prompt: String,
}

impl GenerateImageDto {
    pub fn normalized(self) -> Self {
        Self {
            prompt: self.prompt.trim().to_string(),
            ..self
        }
    }
}

/// Request DTO for approving or rejecting a queued image
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReviewImageDto {
    pub id: Uuid,
    /// Free-form reviewer label, stored on approve
    #[serde(default, rename = "approvedBy")]
    pub approved_by: Option<String>,
}

impl ReviewImageDto {
    pub fn normalized(self) -> Self {
        Self {
            approved_by: trim_to_option(self.approved_by),
            ..self
        }
    }
}

/// Response DTO for a queued image
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AiImageResponseDto {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub prompt: String,
    pub image_url: String,
    pub status: AiImageStatus,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AiImage> for AiImageResponseDto {
    fn from(img: AiImage) -> Self {
        Self {
            id: img.id,
            submission_id: img.submission_id,
            prompt: img.prompt,
            image_url: img.image_url,
            status: img.status,
            approved_at: img.approved_at,
            approved_by: img.approved_by,
            created_at: img.created_at,
        }
    }
}
