//! Persistence port for the board.
//!
//! Every method is one atomic storage operation. Ledger writes (reactions,
//! reports) check the target submission, write the ledger row and update the
//! aggregate inside a single transaction or lock scope, so services never
//! read-then-write counters themselves.

mod memory;
mod postgres;

pub use memory::MemoryBoardStore;
pub use postgres::PgBoardStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::ai_images::models::{AiImage, AiImageStatus, NewAiImage};
use crate::features::comments::models::{Comment, NewComment};
use crate::features::feed::models::{FeedItem, FeedQuery};
use crate::features::reactions::models::{ReactionChange, ReactionKind, ReactionMode, ReactionTotals};
use crate::features::reports::models::{NewReport, Report, ReportOutcome, ReportPolicy};
use crate::features::submissions::models::{NewSubmission, Submission, SubmissionStatus};

#[async_trait]
pub trait BoardStore: Send + Sync {
    // Submissions
    async fn insert_submission(&self, new: NewSubmission) -> Result<Submission>;
    async fn find_submission(&self, id: Uuid) -> Result<Option<Submission>>;
    /// Compare-and-set on status. Returns `None` when the row is gone or no
    /// longer in `from`. Moving to `approved` clears any rejection reason.
    async fn update_status(
        &self,
        id: Uuid,
        from: SubmissionStatus,
        to: SubmissionStatus,
        rejection_reason: Option<String>,
    ) -> Result<Option<Submission>>;
    /// Remove a submission with its reactions, reports, comments and images
    async fn delete_submission(&self, id: Uuid) -> Result<bool>;
    /// Newest first
    async fn list_by_status(&self, status: SubmissionStatus, limit: i64) -> Result<Vec<Submission>>;
    /// Approved and flagged, newest first
    async fn list_flagged(&self, limit: i64) -> Result<Vec<Submission>>;

    // Reaction ledger
    /// Upsert the voter's entry on an approved submission and return the
    /// fresh totals. `None` when the submission is missing or not approved.
    async fn react(
        &self,
        submission_id: Uuid,
        voter: &str,
        kind: ReactionKind,
        mode: ReactionMode,
    ) -> Result<Option<ReactionChange>>;
    /// Zero-filled totals for one submission
    async fn reaction_totals(&self, submission_id: Uuid) -> Result<ReactionTotals>;

    // Report ledger
    async fn record_report(&self, new: NewReport, policy: ReportPolicy) -> Result<ReportOutcome>;
    /// Newest first
    async fn list_reports(&self, submission_id: Uuid, limit: i64) -> Result<Vec<Report>>;

    // Comment log
    /// `None` when the submission is missing or not approved
    async fn insert_comment(&self, new: NewComment) -> Result<Option<Comment>>;
    /// Newest first
    async fn list_comments(&self, submission_id: Uuid, limit: i64) -> Result<Vec<Comment>>;

    // Feed
    /// Approved, unflagged submissions with zero-filled aggregates
    async fn list_feed(&self, query: &FeedQuery) -> Result<Vec<FeedItem>>;

    // AI image queue
    async fn insert_ai_image(&self, new: NewAiImage) -> Result<AiImage>;
    async fn find_ai_image(&self, id: Uuid) -> Result<Option<AiImage>>;
    /// Newest first
    async fn list_ai_images(&self, status: AiImageStatus, limit: i64) -> Result<Vec<AiImage>>;
    /// Compare-and-set on status. Approving stamps `approved_at`/`approved_by`
    /// and copies the image URL onto the submission in the same operation.
    async fn update_ai_image_status(
        &self,
        id: Uuid,
        from: AiImageStatus,
        to: AiImageStatus,
        approved_by: Option<String>,
    ) -> Result<Option<AiImage>>;
}
