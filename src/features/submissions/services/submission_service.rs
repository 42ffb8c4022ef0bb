use std::sync::Arc;

use crate::core::error::Result;
use crate::features::submissions::dtos::{CreateSubmissionDto, SubmitResponseDto};
use crate::features::submissions::models::{Category, NewSubmission};
use crate::modules::notifier::DiscordNotifier;
use crate::modules::store::BoardStore;
use crate::shared::validation::ContentFilter;

/// Service for the public submit action
pub struct SubmissionService {
    store: Arc<dyn BoardStore>,
    filter: ContentFilter,
    notifier: DiscordNotifier,
}

impl SubmissionService {
    pub fn new(store: Arc<dyn BoardStore>, filter: ContentFilter, notifier: DiscordNotifier) -> Self {
        Self {
            store,
            filter,
            notifier,
        }
    }

    /// Store a new post as `pending`. Expects a normalized, validated DTO.
    pub async fn submit(&self, dto: CreateSubmissionDto) -> Result<SubmitResponseDto> {
        let category: Category = dto.category.parse()?;

        self.filter.check_all(
            [dto.title.as_str(), dto.content.as_str()]
                .into_iter()
                .chain(dto.barrio.as_deref()),
        )?;

        let submission = self
            .store
            .insert_submission(NewSubmission {
                category,
                title: dto.title,
                content: dto.content,
                barrio: dto.barrio,
                imagen_url: dto.imagen_url,
            })
            .await?;

        tracing::info!(
            "Submission created: id={}, category={}",
            submission.id,
            submission.category
        );

        self.notifier.notify_new_submission(&submission);

        Ok(SubmitResponseDto {
            id: submission.id,
            status: submission.status,
        })
    }
}
