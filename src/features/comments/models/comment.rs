use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for comment. Comments are never edited.
#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub body: String,
    pub nickname: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new comment
#[derive(Debug, Clone)]
pub struct NewComment {
    pub submission_id: Uuid,
    pub body: String,
    pub nickname: Option<String>,
}
