use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::submissions::models::SubmissionStatus;
use crate::modules::notifier::PingReport;
use crate::shared::validation::trim_to_option;

const REASON_MAX_CHARS: usize = 300;

/// Request DTO for a moderation decision
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_reject_reason"))]
pub struct ModerateDto {
    pub id: Uuid,
    /// approve, reject or delete
    #[serde(default)]
    #[schema(example = "approve")]
    pub action: String,
    /// Only kept for reject, and only checked there
    pub reason: Option<String>,
}

fn validate_reject_reason(dto: &ModerateDto) -> Result<(), ValidationError> {
    let is_reject = dto.action.trim().eq_ignore_ascii_case("reject");
    let too_long = dto
        .reason
        .as_ref()
        .is_some_and(|r| r.chars().count() > REASON_MAX_CHARS);

    if is_reject && too_long {
        return Err(ValidationError::new("reason_length")
            .with_message("El motivo no debe exceder 300 caracteres.".into()));
    }
    Ok(())
}

impl ModerateDto {
    pub fn normalized(self) -> Self {
        Self {
            reason: trim_to_option(self.reason),
            ..self
        }
    }
}

/// Outcome of a moderation decision
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModerateResponseDto {
    pub id: Uuid,
    pub action: String,
    /// Status after the decision, absent once deleted
    pub status: Option<SubmissionStatus>,
    /// False when the submission already had the requested status
    pub changed: bool,
}

/// What Discord answered to the test message
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DiscordPingResponseDto {
    pub status: u16,
    pub body_preview: String,
}

impl From<PingReport> for DiscordPingResponseDto {
    fn from(r: PingReport) -> Self {
        Self {
            status: r.status,
            body_preview: r.body_preview,
        }
    }
}
