use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::AppError;

/// Review status of a generated image, matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "ai_image_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AiImageStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for AiImageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiImageStatus::Pending => write!(f, "pending"),
            AiImageStatus::Approved => write!(f, "approved"),
            AiImageStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Database model for a queued illustration
#[derive(Debug, Clone, FromRow)]
pub struct AiImage {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub prompt: String,
    pub image_url: String,
    pub status: AiImageStatus,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data for queueing a freshly generated image
#[derive(Debug, Clone)]
pub struct NewAiImage {
    pub submission_id: Uuid,
    pub prompt: String,
    pub image_url: String,
}

/// Reviewer decision on a queued image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageDecision {
    Approve,
    Reject,
}

impl ImageDecision {
    pub fn target(&self) -> AiImageStatus {
        match self {
            ImageDecision::Approve => AiImageStatus::Approved,
            ImageDecision::Reject => AiImageStatus::Rejected,
        }
    }
}

/// Resolve a review against the image's current status.
///
/// Returns `None` when the image already carries the requested status.
pub fn plan_review(
    current: AiImageStatus,
    decision: ImageDecision,
) -> Result<Option<AiImageStatus>, AppError> {
    let target = decision.target();
    match current {
        AiImageStatus::Pending => Ok(Some(target)),
        status if status == target => Ok(None),
        AiImageStatus::Approved => Err(AppError::Conflict(
            "La imagen ya fue aprobada".to_string(),
        )),
        _ => Err(AppError::Conflict(
            "La imagen ya fue rechazada".to_string(),
        )),
    }
}
