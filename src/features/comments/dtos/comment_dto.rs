use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::comments::models::Comment;
use crate::shared::constants::{DEFAULT_COMMENT_LIMIT, MAX_COMMENT_LIMIT};
use crate::shared::validation::trim_to_option;

/// Request DTO for a new comment
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct CreateCommentDto {
    #[validate(length(
        min = 3,
        max = 500,
        message = "El comentario debe tener entre 3 y 500 caracteres."
    ))]
    pub body: String,

    #[validate(length(max = 40, message = "El apodo no debe exceder 40 caracteres."))]
    pub nickname: Option<String>,
}

impl CreateCommentDto {
    pub fn normalized(self) -> Self {
        Self {
            body: self.body.trim().to_string(),
            nickname: trim_to_option(self.nickname),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CommentListQuery {
    /// Page size, 1 to 100 (default 30)
    pub limit: Option<i64>,
}

impl CommentListQuery {
    /// Requested limit clamped to the allowed range
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_COMMENT_LIMIT)
            .clamp(1, MAX_COMMENT_LIMIT)
    }
}

/// Response DTO for a comment
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentResponseDto {
    pub id: Uuid,
    pub body: String,
    pub nickname: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponseDto {
    fn from(c: Comment) -> Self {
        Self {
            id: c.id,
            body: c.body,
            nickname: c.nickname,
            created_at: c.created_at,
        }
    }
}
