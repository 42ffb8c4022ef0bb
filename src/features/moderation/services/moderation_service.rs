use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::moderation::dtos::{DiscordPingResponseDto, ModerateDto, ModerateResponseDto};
use crate::features::moderation::models::{plan, GatePlan, ModerationAction};
use crate::features::reports::dtos::ReportResponseDto;
use crate::features::submissions::dtos::SubmissionResponseDto;
use crate::features::submissions::models::SubmissionStatus;
use crate::modules::notifier::DiscordNotifier;
use crate::modules::store::BoardStore;
use crate::shared::constants::MODERATION_QUEUE_LIMIT;

/// A concurrent moderator can move the row at most once more (pending to a
/// terminal state), so a single re-plan always settles the outcome.
const MAX_GATE_ATTEMPTS: usize = 2;

fn not_found() -> AppError {
    AppError::NotFound("Publicación no encontrada".to_string())
}

/// Service behind the moderator-only surface
pub struct ModerationService {
    store: Arc<dyn BoardStore>,
    notifier: DiscordNotifier,
}

impl ModerationService {
    pub fn new(store: Arc<dyn BoardStore>, notifier: DiscordNotifier) -> Self {
        Self { store, notifier }
    }

    /// Apply approve, reject or delete. At most one status write per call.
    pub async fn moderate(&self, dto: ModerateDto) -> Result<ModerateResponseDto> {
        let action: ModerationAction = dto.action.parse()?;
        let reason = match action {
            ModerationAction::Reject => dto.reason,
            _ => None,
        };
        let id = dto.id;

        for _ in 0..MAX_GATE_ATTEMPTS {
            let current = self
                .store
                .find_submission(id)
                .await?
                .ok_or_else(not_found)?;

            match plan(current.status, action)? {
                GatePlan::Unchanged => {
                    return Ok(ModerateResponseDto {
                        id,
                        action: action.as_str().to_string(),
                        status: Some(current.status),
                        changed: false,
                    });
                }
                GatePlan::Delete => {
                    if !self.store.delete_submission(id).await? {
                        return Err(not_found());
                    }
                    tracing::info!("Submission deleted: id={}", id);
                    return Ok(ModerateResponseDto {
                        id,
                        action: action.as_str().to_string(),
                        status: None,
                        changed: true,
                    });
                }
                GatePlan::Write(to) => {
                    let updated = self
                        .store
                        .update_status(id, current.status, to, reason.clone())
                        .await?;

                    if let Some(updated) = updated {
                        tracing::info!(
                            "Submission moderated: id={}, {} -> {}",
                            id,
                            current.status,
                            updated.status
                        );
                        return Ok(ModerateResponseDto {
                            id,
                            action: action.as_str().to_string(),
                            status: Some(updated.status),
                            changed: true,
                        });
                    }

                    tracing::warn!("Submission {} changed during moderation, re-planning", id);
                }
            }
        }

        Err(AppError::Conflict(
            "La publicación cambió mientras se moderaba, intenta de nuevo".to_string(),
        ))
    }

    pub async fn list_pending(&self) -> Result<Vec<SubmissionResponseDto>> {
        let rows = self
            .store
            .list_by_status(SubmissionStatus::Pending, MODERATION_QUEUE_LIMIT)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn list_flagged(&self) -> Result<Vec<SubmissionResponseDto>> {
        let rows = self.store.list_flagged(MODERATION_QUEUE_LIMIT).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Reports filed against one submission, newest first
    pub async fn list_reports(&self, submission_id: Uuid) -> Result<Vec<ReportResponseDto>> {
        self.store
            .find_submission(submission_id)
            .await?
            .ok_or_else(not_found)?;

        let reports = self
            .store
            .list_reports(submission_id, MODERATION_QUEUE_LIMIT)
            .await?;
        Ok(reports.into_iter().map(Into::into).collect())
    }

    pub async fn discord_ping(&self) -> Result<DiscordPingResponseDto> {
        let report = self.notifier.ping().await?;
        tracing::info!("Discord ping answered {}", report.status);
        Ok(report.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::submissions::models::{Category, NewSubmission};
    use crate::modules::store::MemoryBoardStore;

    async fn setup() -> (ModerationService, Arc<dyn BoardStore>, Uuid) {
        let store: Arc<dyn BoardStore> = Arc::new(MemoryBoardStore::new());
        let submission = store
            .insert_submission(NewSubmission {
                category: Category::Rumor,
                title: "Se dice que cierran el mercado".to_string(),
                content: "Dicen que el mercado municipal cierra en enero".to_string(),
                barrio: None,
                imagen_url: None,
            })
            .await
            .unwrap();
        let service = ModerationService::new(store.clone(), DiscordNotifier::disabled());
        (service, store, submission.id)
    }

    fn dto(id: Uuid, action: &str, reason: Option<&str>) -> ModerateDto {
        ModerateDto {
            id,
            action: action.to_string(),
            reason: reason.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_reject_keeps_reason() {
        let (service, store, id) = setup().await;

        let response = service
            .moderate(dto(id, "reject", Some("Sin fuentes")))
            .await
            .unwrap();
        assert_eq!(response.status, Some(SubmissionStatus::Rejected));

        let stored = store.find_submission(id).await.unwrap().unwrap();
        assert_eq!(stored.rejection_reason.as_deref(), Some("Sin fuentes"));
    }

    #[tokio::test]
    async fn test_reason_ignored_on_approve() {
        let (service, store, id) = setup().await;

        service
            .moderate(dto(id, "approve", Some("irrelevante")))
            .await
            .unwrap();

        let stored = store.find_submission(id).await.unwrap().unwrap();
        assert_eq!(stored.status, SubmissionStatus::Approved);
        assert!(stored.rejection_reason.is_none());
    }

    #[tokio::test]
    async fn test_reapprove_is_noop() {
        let (service, _, id) = setup().await;

        assert!(service.moderate(dto(id, "approve", None)).await.unwrap().changed);
        let again = service.moderate(dto(id, "approve", None)).await.unwrap();
        assert!(!again.changed);
        assert_eq!(again.status, Some(SubmissionStatus::Approved));
    }

    #[tokio::test]
    async fn test_delete_is_final() {
        let (service, store, id) = setup().await;

        service.moderate(dto(id, "delete", None)).await.unwrap();
        assert!(store.find_submission(id).await.unwrap().is_none());

        let err = service.moderate(dto(id, "approve", None)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unknown_action_is_validation_error() {
        let (service, _, id) = setup().await;
        let err = service.moderate(dto(id, "publish", None)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_pending_queue_shrinks_after_approve() {
        let (service, _, id) = setup().await;
        assert_eq!(service.list_pending().await.unwrap().len(), 1);

        service.moderate(dto(id, "approve", None)).await.unwrap();
        assert!(service.list_pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ping_without_webhook_is_upstream_error() {
        let (service, _, _) = setup().await;
        let err = service.discord_ping().await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }
}
