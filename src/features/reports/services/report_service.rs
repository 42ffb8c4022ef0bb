use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::reports::dtos::CreateReportDto;
use crate::features::reports::models::{NewReport, ReportOutcome, ReportPolicy};
use crate::modules::store::BoardStore;
use crate::shared::validation::normalize_voter;

/// Service for the report ledger
pub struct ReportService {
    store: Arc<dyn BoardStore>,
    policy: ReportPolicy,
}

impl ReportService {
    pub fn new(store: Arc<dyn BoardStore>, policy: ReportPolicy) -> Self {
        Self { store, policy }
    }

    /// File one report per voter per submission, within the hourly limit.
    /// Expects a normalized, validated DTO.
    pub async fn report(&self, dto: CreateReportDto) -> Result<()> {
        let voter = normalize_voter(&dto.voter)?;
        let submission_id = dto.submission_id;

        let outcome = self
            .store
            .record_report(
                NewReport {
                    submission_id,
                    voter,
                    reason: dto.reason,
                },
                self.policy,
            )
            .await?;

        match outcome {
            ReportOutcome::Recorded {
                report_count,
                flagged,
            } => {
                tracing::info!(
                    "Report recorded: submission={}, report_count={}, flagged={}",
                    submission_id,
                    report_count,
                    flagged
                );
                Ok(())
            }
            ReportOutcome::Duplicate => Err(AppError::Conflict(
                "Ya reportaste esta publicación".to_string(),
            )),
            ReportOutcome::RateLimited => {
                tracing::warn!("Report rate limit hit on submission {}", submission_id);
                Err(AppError::RateLimited(
                    "Has enviado demasiados reportes. Intenta más tarde.".to_string(),
                ))
            }
            ReportOutcome::SubmissionUnavailable => Err(AppError::NotFound(
                "Publicación no encontrada".to_string(),
            )),
        }
    }
}
