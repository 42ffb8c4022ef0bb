use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::config::LedgerConfig;

/// Database model for a report entry
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub voter: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Data for filing a new report
#[derive(Debug, Clone)]
pub struct NewReport {
    pub submission_id: Uuid,
    pub voter: String,
    pub reason: String,
}

/// Limits applied while recording a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPolicy {
    /// Reports a voter may file in the trailing hour
    pub max_per_hour: i64,
    /// report_count that flags a submission; 0 never flags
    pub flag_threshold: i32,
}

impl ReportPolicy {
    pub fn is_rate_limited(&self, reports_in_window: i64) -> bool {
        reports_in_window >= self.max_per_hour
    }

    pub fn should_flag(&self, report_count: i32) -> bool {
        self.flag_threshold > 0 && report_count >= self.flag_threshold
    }
}

impl From<LedgerConfig> for ReportPolicy {
    fn from(config: LedgerConfig) -> Self {
        Self {
            max_per_hour: i64::from(config.report_rate_limit_per_hour),
            flag_threshold: i32::try_from(config.report_flag_threshold).unwrap_or(i32::MAX),
        }
    }
}

/// Result of one atomic report write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    Recorded { report_count: i32, flagged: bool },
    /// Same voter already reported this submission
    Duplicate,
    /// Voter hit the hourly limit
    RateLimited,
    /// Submission is missing or not approved
    SubmissionUnavailable,
}
