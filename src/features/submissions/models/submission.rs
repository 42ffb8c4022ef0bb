use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::AppError;

/// Submission category enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "submission_category", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    /// Unverified gossip
    Rumor,
    /// Citizen report about a local problem
    Reporte,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Rumor => "RUMOR",
            Category::Reporte => "REPORTE",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RUMOR" => Ok(Category::Rumor),
            "REPORTE" => Ok(Category::Reporte),
            _ => Err(AppError::Validation("Categoría inválida".to_string())),
        }
    }
}

/// Moderation status enum matching database enum.
///
/// Deletion removes the row, so it has no status of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "submission_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Pending => write!(f, "pending"),
            SubmissionStatus::Approved => write!(f, "approved"),
            SubmissionStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Database model for submission
#[derive(Debug, Clone, FromRow)]
pub struct Submission {
    pub id: Uuid,
    pub category: Category,
    pub title: String,
    pub content: String,
    pub barrio: Option<String>,
    pub imagen_url: Option<String>,
    pub status: SubmissionStatus,
    pub rejection_reason: Option<String>,
    /// Soft-hide set by the report ledger; independent from `status`
    pub flagged: bool,
    pub report_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Submission {
    /// Reactions, reports and comments only target approved submissions
    pub fn accepts_interactions(&self) -> bool {
        self.status == SubmissionStatus::Approved
    }

    /// Visible through the public feed
    pub fn is_public(&self) -> bool {
        self.accepts_interactions() && !self.flagged
    }
}

/// Data for creating a new submission. Status always starts at `pending`.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub category: Category,
    pub title: String,
    pub content: String,
    pub barrio: Option<String>,
    pub imagen_url: Option<String>,
}
