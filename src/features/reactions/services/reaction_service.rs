use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reactions::dtos::{ReactDto, VoteDto, VoteResponseDto};
use crate::features::reactions::models::{ReactionKind, ReactionMode, ReactionTotals};
use crate::modules::store::BoardStore;
use crate::shared::validation::normalize_voter;

fn not_found() -> AppError {
    AppError::NotFound("Publicación no encontrada".to_string())
}

/// Service for the reaction ledger and the legacy upvote built on it
pub struct ReactionService {
    store: Arc<dyn BoardStore>,
}

impl ReactionService {
    pub fn new(store: Arc<dyn BoardStore>) -> Self {
        Self { store }
    }

    /// Set the voter's reaction, replacing a different previous one
    pub async fn react(&self, dto: ReactDto) -> Result<ReactionTotals> {
        let voter = normalize_voter(&dto.voter)?;
        let kind: ReactionKind = dto.reaction.parse()?;

        let change = self
            .store
            .react(dto.id, &voter, kind, ReactionMode::Replace)
            .await?
            .ok_or_else(not_found)?;

        if change.previous != Some(change.current) {
            tracing::info!(
                "Reaction recorded: submission={}, kind={}, replaced={:?}",
                dto.id,
                change.current,
                change.previous
            );
        }

        Ok(change.totals)
    }

    /// Legacy upvote: a `like` that never overwrites an existing entry
    pub async fn vote(&self, dto: VoteDto) -> Result<VoteResponseDto> {
        let voter = normalize_voter(&dto.voter)?;

        let change = self
            .store
            .react(dto.id, &voter, ReactionKind::Like, ReactionMode::KeepExisting)
            .await?
            .ok_or_else(not_found)?;

        let counted = change.is_new_entry();
        if counted {
            tracing::info!("Vote recorded: submission={}", dto.id);
        }

        Ok(VoteResponseDto {
            score: change.totals.score(),
            counted,
        })
    }

    /// Zero-filled totals of an approved submission
    pub async fn totals(&self, submission_id: Uuid) -> Result<ReactionTotals> {
        let submission = self
            .store
            .find_submission(submission_id)
            .await?
            .filter(|s| s.accepts_interactions())
            .ok_or_else(not_found)?;

        self.store.reaction_totals(submission.id).await
    }
}
