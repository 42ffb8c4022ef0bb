use chrono::{Duration, NaiveTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::ai_images::dtos::{AiImageResponseDto, GenerateImageDto, ReviewImageDto};
use crate::features::ai_images::models::{plan_review, AiImageStatus, ImageDecision, NewAiImage};
use crate::features::feed::models::{FeedQuery, FeedSort};
use crate::modules::image_gen::ImageGenerator;
use crate::modules::storage::PublicObjectStore;
use crate::modules::store::BoardStore;
use crate::shared::constants::MODERATION_QUEUE_LIMIT;
use crate::shared::templates::render_top_of_day_prompt;

const MAX_REVIEW_ATTEMPTS: usize = 2;

/// Service for the AI illustration queue
pub struct AiImageService {
    store: Arc<dyn BoardStore>,
    generator: Option<Arc<dyn ImageGenerator>>,
    images: Option<Arc<dyn PublicObjectStore>>,
}

impl AiImageService {
    pub fn new(
        store: Arc<dyn BoardStore>,
        generator: Option<Arc<dyn ImageGenerator>>,
        images: Option<Arc<dyn PublicObjectStore>>,
    ) -> Self {
        Self {
            store,
            generator,
            images,
        }
    }

    /// Generate, upload and queue an illustration. Expects a normalized,
    /// validated DTO.
    pub async fn generate(&self, dto: GenerateImageDto) -> Result<AiImageResponseDto> {
        self.store
            .find_submission(dto.submission_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Publicación no encontrada".to_string()))?;

        self.generate_for(dto.submission_id, dto.prompt).await
    }

    async fn generate_for(&self, submission_id: Uuid, prompt: String) -> Result<AiImageResponseDto> {
        let (generator, images) = match (&self.generator, &self.images) {
            (Some(g), Some(i)) => (g, i),
            _ => {
                return Err(AppError::Upstream(
                    "La generación de imágenes no está configurada".to_string(),
                ))
            }
        };

        let png = generator.generate(&prompt).await?;
        let path = format!("ai/{}/{}.png", submission_id, Uuid::now_v7());
        let image_url = images.put_public(&path, png, "image/png").await?;

        let image = self
            .store
            .insert_ai_image(NewAiImage {
                submission_id,
                prompt,
                image_url,
            })
            .await?;

        tracing::info!(
            "AI image queued: id={}, submission={}",
            image.id,
            submission_id
        );

        Ok(image.into())
    }

    /// Pending images, newest first
    pub async fn list_queue(&self) -> Result<Vec<AiImageResponseDto>> {
        let images = self
            .store
            .list_ai_images(AiImageStatus::Pending, MODERATION_QUEUE_LIMIT)
            .await?;
        Ok(images.into_iter().map(Into::into).collect())
    }

    pub async fn approve(&self, dto: ReviewImageDto) -> Result<AiImageResponseDto> {
        self.review(dto.id, ImageDecision::Approve, dto.approved_by)
            .await
    }

    pub async fn reject(&self, dto: ReviewImageDto) -> Result<AiImageResponseDto> {
        self.review(dto.id, ImageDecision::Reject, None).await
    }

    async fn review(
        &self,
        id: Uuid,
        decision: ImageDecision,
        approved_by: Option<String>,
    ) -> Result<AiImageResponseDto> {
        for _ in 0..MAX_REVIEW_ATTEMPTS {
            let current = self
                .store
                .find_ai_image(id)
                .await?
                .ok_or_else(|| AppError::NotFound("Imagen no encontrada".to_string()))?;

            let Some(target) = plan_review(current.status, decision)? else {
                return Ok(current.into());
            };

            if let Some(updated) = self
                .store
                .update_ai_image_status(id, current.status, target, approved_by.clone())
                .await?
            {
                tracing::info!("AI image reviewed: id={}, status={}", id, updated.status);
                return Ok(updated.into());
            }
        }

        Err(AppError::Conflict(
            "La imagen cambió mientras se revisaba, intenta de nuevo".to_string(),
        ))
    }

    /// Illustrate yesterday's best scored post (UTC day).
    /// `None` when nothing was published yesterday.
    pub async fn top_of_day(&self) -> Result<Option<AiImageResponseDto>> {
        let today = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
        let query = FeedQuery {
            created_from: Some(today - Duration::days(1)),
            created_to: Some(today),
            sort: FeedSort::Score,
            limit: 1,
            ..Default::default()
        };

        let Some(top) = self.store.list_feed(&query).await?.into_iter().next() else {
            return Ok(None);
        };

        let prompt = render_top_of_day_prompt(top.category, &top.title)
            .map_err(|e| AppError::Internal(format!("Failed to render image prompt: {}", e)))?;

        self.generate_for(top.id, prompt).await.map(Some)
    }
}
