use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::comments::dtos::{CommentResponseDto, CreateCommentDto};
use crate::features::comments::models::NewComment;
use crate::modules::store::BoardStore;
use crate::shared::validation::ContentFilter;

fn not_found() -> AppError {
    AppError::NotFound("Publicación no encontrada".to_string())
}

/// Service for the append-only comment log
pub struct CommentService {
    store: Arc<dyn BoardStore>,
    filter: ContentFilter,
}

impl CommentService {
    pub fn new(store: Arc<dyn BoardStore>, filter: ContentFilter) -> Self {
        Self { store, filter }
    }

    /// Append a comment to an approved submission.
    /// Expects a normalized, validated DTO.
    pub async fn add(&self, submission_id: Uuid, dto: CreateCommentDto) -> Result<CommentResponseDto> {
        self.filter
            .check_all([dto.body.as_str()].into_iter().chain(dto.nickname.as_deref()))?;

        let comment = self
            .store
            .insert_comment(NewComment {
                submission_id,
                body: dto.body,
                nickname: dto.nickname,
            })
            .await?
            .ok_or_else(not_found)?;

        tracing::info!(
            "Comment created: id={}, submission={}",
            comment.id,
            submission_id
        );

        Ok(comment.into())
    }

    /// Newest first, at most `limit`
    pub async fn list(&self, submission_id: Uuid, limit: i64) -> Result<Vec<CommentResponseDto>> {
        self.store
            .find_submission(submission_id)
            .await?
            .filter(|s| s.accepts_interactions())
            .ok_or_else(not_found)?;

        let comments = self.store.list_comments(submission_id, limit).await?;
        Ok(comments.into_iter().map(Into::into).collect())
    }
}
