use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::BoardStore;
use crate::core::error::Result;
use crate::features::ai_images::models::{AiImage, AiImageStatus, NewAiImage};
use crate::features::comments::models::{Comment, NewComment};
use crate::features::feed::models::{FeedItem, FeedQuery};
use crate::features::reactions::models::{
    resolve_entry, ReactionChange, ReactionKind, ReactionMode, ReactionTotals,
};
use crate::features::reports::models::{NewReport, Report, ReportOutcome, ReportPolicy};
use crate::features::submissions::models::{NewSubmission, Submission, SubmissionStatus};

#[derive(Default)]
struct BoardState {
    submissions: HashMap<Uuid, Submission>,
    /// Reaction ledger keyed by (submission, voter)
    reactions: HashMap<(Uuid, String), ReactionKind>,
    totals: HashMap<Uuid, ReactionTotals>,
    reports: Vec<Report>,
    comments: Vec<Comment>,
    ai_images: HashMap<Uuid, AiImage>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl BoardState {
    /// Strictly increasing clock so "newest first" stays deterministic
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(ts);
        ts
    }

    fn is_approved(&self, id: Uuid) -> bool {
        self.submissions
            .get(&id)
            .is_some_and(|s| s.status == SubmissionStatus::Approved)
    }
}

fn newest_first<T>(mut items: Vec<T>, created_at: impl Fn(&T) -> DateTime<Utc>, limit: i64) -> Vec<T> {
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
    items.truncate(usize::try_from(limit).unwrap_or(0));
    items
}

/// Process-local adapter for `BoardStore`.
///
/// Every operation holds the write guard for its whole duration, which gives
/// ledger writes the same atomicity as a database transaction.
#[derive(Default)]
pub struct MemoryBoardStore {
    state: RwLock<BoardState>,
}

impl MemoryBoardStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BoardStore for MemoryBoardStore {
    async fn insert_submission(&self, new: NewSubmission) -> Result<Submission> {
        let mut state = self.state.write().await;
        let now = state.next_timestamp();

        let submission = Submission {
            id: Uuid::new_v4(),
            category: new.category,
            title: new.title,
            content: new.content,
            barrio: new.barrio,
            imagen_url: new.imagen_url,
            status: SubmissionStatus::Pending,
            rejection_reason: None,
            flagged: false,
            report_count: 0,
            created_at: now,
            updated_at: now,
        };
        state.submissions.insert(submission.id, submission.clone());

        Ok(submission)
    }

    async fn find_submission(&self, id: Uuid) -> Result<Option<Submission>> {
        let state = self.state.read().await;
        Ok(state.submissions.get(&id).cloned())
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: SubmissionStatus,
        to: SubmissionStatus,
        rejection_reason: Option<String>,
    ) -> Result<Option<Submission>> {
        let mut state = self.state.write().await;
        let now = state.next_timestamp();

        let Some(submission) = state.submissions.get_mut(&id) else {
            return Ok(None);
        };
        if submission.status != from {
            return Ok(None);
        }

        submission.status = to;
        submission.rejection_reason = match to {
            SubmissionStatus::Approved => None,
            _ => rejection_reason,
        };
        submission.updated_at = now;

        Ok(Some(submission.clone()))
    }

    async fn delete_submission(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;

        if state.submissions.remove(&id).is_none() {
            return Ok(false);
        }
        state.reactions.retain(|(submission_id, _), _| *submission_id != id);
        state.totals.remove(&id);
        state.reports.retain(|r| r.submission_id != id);
        state.comments.retain(|c| c.submission_id != id);
        state.ai_images.retain(|_, image| image.submission_id != id);

        Ok(true)
    }

    async fn list_by_status(&self, status: SubmissionStatus, limit: i64) -> Result<Vec<Submission>> {
        let state = self.state.read().await;
        let matching = state
            .submissions
            .values()
            .filter(|s| s.status == status)
            .cloned()
            .collect();

        Ok(newest_first(matching, |s| s.created_at, limit))
    }

    async fn list_flagged(&self, limit: i64) -> Result<Vec<Submission>> {
        let state = self.state.read().await;
        let matching = state
            .submissions
            .values()
            .filter(|s| s.status == SubmissionStatus::Approved && s.flagged)
            .cloned()
            .collect();

        Ok(newest_first(matching, |s| s.created_at, limit))
    }

    async fn react(
        &self,
        submission_id: Uuid,
        voter: &str,
        kind: ReactionKind,
        mode: ReactionMode,
    ) -> Result<Option<ReactionChange>> {
        let mut state = self.state.write().await;
        if !state.is_approved(submission_id) {
            return Ok(None);
        }

        let key = (submission_id, voter.to_string());
        let previous = state.reactions.get(&key).copied();
        let current = resolve_entry(previous, kind, mode);

        state.reactions.insert(key, current);
        let totals = state.totals.entry(submission_id).or_default();
        totals.apply(previous, current);

        Ok(Some(ReactionChange {
            previous,
            current,
            totals: *totals,
        }))
    }

    async fn reaction_totals(&self, submission_id: Uuid) -> Result<ReactionTotals> {
        let state = self.state.read().await;
        Ok(state.totals.get(&submission_id).copied().unwrap_or_default())
    }

    async fn record_report(&self, new: NewReport, policy: ReportPolicy) -> Result<ReportOutcome> {
        let mut state = self.state.write().await;
        if !state.is_approved(new.submission_id) {
            return Ok(ReportOutcome::SubmissionUnavailable);
        }

        if state
            .reports
            .iter()
            .any(|r| r.submission_id == new.submission_id && r.voter == new.voter)
        {
            return Ok(ReportOutcome::Duplicate);
        }

        let now = state.next_timestamp();
        let window_start = now - Duration::hours(1);
        let in_window = state
            .reports
            .iter()
            .filter(|r| r.voter == new.voter && r.created_at > window_start)
            .count() as i64;
        if policy.is_rate_limited(in_window) {
            return Ok(ReportOutcome::RateLimited);
        }

        state.reports.push(Report {
            id: Uuid::new_v4(),
            submission_id: new.submission_id,
            voter: new.voter,
            reason: new.reason,
            created_at: now,
        });

        let Some(submission) = state.submissions.get_mut(&new.submission_id) else {
            return Ok(ReportOutcome::SubmissionUnavailable);
        };
        submission.report_count += 1;
        if policy.should_flag(submission.report_count) {
            submission.flagged = true;
        }
        submission.updated_at = now;

        Ok(ReportOutcome::Recorded {
            report_count: submission.report_count,
            flagged: submission.flagged,
        })
    }

    async fn list_reports(&self, submission_id: Uuid, limit: i64) -> Result<Vec<Report>> {
        let state = self.state.read().await;
        let matching = state
            .reports
            .iter()
            .filter(|r| r.submission_id == submission_id)
            .cloned()
            .collect();

        Ok(newest_first(matching, |r| r.created_at, limit))
    }

    async fn insert_comment(&self, new: NewComment) -> Result<Option<Comment>> {
        let mut state = self.state.write().await;
        if !state.is_approved(new.submission_id) {
            return Ok(None);
        }

        let comment = Comment {
            id: Uuid::new_v4(),
            submission_id: new.submission_id,
            body: new.body,
            nickname: new.nickname,
            created_at: state.next_timestamp(),
        };
        state.comments.push(comment.clone());

        Ok(Some(comment))
    }

    async fn list_comments(&self, submission_id: Uuid, limit: i64) -> Result<Vec<Comment>> {
        let state = self.state.read().await;
        let matching = state
            .comments
            .iter()
            .filter(|c| c.submission_id == submission_id)
            .cloned()
            .collect();

        Ok(newest_first(matching, |c| c.created_at, limit))
    }

    async fn list_feed(&self, query: &FeedQuery) -> Result<Vec<FeedItem>> {
        let state = self.state.read().await;

        let mut items: Vec<FeedItem> = state
            .submissions
            .values()
            .filter(|s| s.is_public())
            .filter(|s| query.matches(s.category, s.barrio.as_deref(), s.created_at))
            .map(|s| FeedItem {
                id: s.id,
                category: s.category,
                title: s.title.clone(),
                content: s.content.clone(),
                barrio: s.barrio.clone(),
                imagen_url: s.imagen_url.clone(),
                created_at: s.created_at,
                totals: state.totals.get(&s.id).copied().unwrap_or_default(),
                comment_count: state
                    .comments
                    .iter()
                    .filter(|c| c.submission_id == s.id)
                    .count() as i64,
            })
            .collect();

        items.sort_by(|a, b| query.sort.compare(a, b));
        items.truncate(usize::try_from(query.limit).unwrap_or(0));

        Ok(items)
    }

    async fn insert_ai_image(&self, new: NewAiImage) -> Result<AiImage> {
        let mut state = self.state.write().await;

        let image = AiImage {
            id: Uuid::new_v4(),
            submission_id: new.submission_id,
            prompt: new.prompt,
            image_url: new.image_url,
            status: AiImageStatus::Pending,
            approved_at: None,
            approved_by: None,
            created_at: state.next_timestamp(),
        };
        state.ai_images.insert(image.id, image.clone());

        Ok(image)
    }

    async fn find_ai_image(&self, id: Uuid) -> Result<Option<AiImage>> {
        let state = self.state.read().await;
        Ok(state.ai_images.get(&id).cloned())
    }

    async fn list_ai_images(&self, status: AiImageStatus, limit: i64) -> Result<Vec<AiImage>> {
        let state = self.state.read().await;
        let matching = state
            .ai_images
            .values()
            .filter(|i| i.status == status)
            .cloned()
            .collect();

        Ok(newest_first(matching, |i| i.created_at, limit))
    }

    async fn update_ai_image_status(
        &self,
        id: Uuid,
        from: AiImageStatus,
        to: AiImageStatus,
        approved_by: Option<String>,
    ) -> Result<Option<AiImage>> {
        let mut state = self.state.write().await;
        let now = state.next_timestamp();

        let Some(image) = state.ai_images.get_mut(&id) else {
            return Ok(None);
        };
        if image.status != from {
            return Ok(None);
        }

        image.status = to;
        if to == AiImageStatus::Approved {
            image.approved_at = Some(now);
            image.approved_by = approved_by;
        }
        let image = image.clone();

        if to == AiImageStatus::Approved {
            if let Some(submission) = state.submissions.get_mut(&image.submission_id) {
                submission.imagen_url = Some(image.image_url.clone());
                submission.updated_at = now;
            }
        }

        Ok(Some(image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::submissions::models::Category;

    fn policy(max_per_hour: i64, flag_threshold: i32) -> ReportPolicy {
        ReportPolicy {
            max_per_hour,
            flag_threshold,
        }
    }

    async fn approved(store: &MemoryBoardStore) -> Submission {
        let submission = store
            .insert_submission(NewSubmission {
                category: Category::Rumor,
                title: "Se dice que el parque cerrará".to_string(),
                content: "Dicen que el parque central cierra en diciembre".to_string(),
                barrio: Some("Centro".to_string()),
                imagen_url: None,
            })
            .await
            .unwrap();
        store
            .update_status(
                submission.id,
                SubmissionStatus::Pending,
                SubmissionStatus::Approved,
                None,
            )
            .await
            .unwrap()
            .unwrap()
    }

    fn ledger_count(state: &BoardState, id: Uuid, kind: ReactionKind) -> i32 {
        state
            .reactions
            .iter()
            .filter(|((s, _), k)| *s == id && **k == kind)
            .count() as i32
    }

    #[tokio::test]
    async fn test_status_cas_rejects_stale_from() {
        let store = MemoryBoardStore::new();
        let submission = approved(&store).await;

        let stale = store
            .update_status(
                submission.id,
                SubmissionStatus::Pending,
                SubmissionStatus::Rejected,
                Some("spam".to_string()),
            )
            .await
            .unwrap();
        assert!(stale.is_none());
    }

    #[tokio::test]
    async fn test_react_on_pending_is_unavailable() {
        let store = MemoryBoardStore::new();
        let pending = store
            .insert_submission(NewSubmission {
                category: Category::Reporte,
                title: "Bache enorme".to_string(),
                content: "Hay un bache enorme en la avenida".to_string(),
                barrio: None,
                imagen_url: None,
            })
            .await
            .unwrap();

        let change = store
            .react(pending.id, "v1", ReactionKind::Like, ReactionMode::Replace)
            .await
            .unwrap();
        assert!(change.is_none());
    }

    #[tokio::test]
    async fn test_totals_match_ledger_after_mixed_writes() {
        let store = MemoryBoardStore::new();
        let s = approved(&store).await;

        for (voter, kind) in [
            ("a", ReactionKind::Like),
            ("b", ReactionKind::Like),
            ("a", ReactionKind::Wow),
            ("c", ReactionKind::Sad),
            ("b", ReactionKind::Like),
            ("c", ReactionKind::Angry),
        ] {
            store
                .react(s.id, voter, kind, ReactionMode::Replace)
                .await
                .unwrap();
        }

        let totals = store.reaction_totals(s.id).await.unwrap();
        let state = store.state.read().await;
        for kind in ReactionKind::ALL {
            assert_eq!(totals.get(kind), ledger_count(&state, s.id, kind));
        }
        assert_eq!(totals.total(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_reactions_do_not_lose_updates() {
        let store = std::sync::Arc::new(MemoryBoardStore::new());
        let id = approved(&store).await.id;

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    let voter = format!("voter-{}", i % 25);
                    store
                        .react(id, &voter, ReactionKind::Like, ReactionMode::Replace)
                        .await
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let totals = store.reaction_totals(id).await.unwrap();
        assert_eq!(totals.like_count, 25);
    }

    #[tokio::test]
    async fn test_keep_existing_never_overwrites() {
        let store = MemoryBoardStore::new();
        let s = approved(&store).await;

        store
            .react(s.id, "v", ReactionKind::Sad, ReactionMode::Replace)
            .await
            .unwrap();
        let change = store
            .react(s.id, "v", ReactionKind::Like, ReactionMode::KeepExisting)
            .await
            .unwrap()
            .unwrap();

        assert!(!change.is_new_entry());
        assert_eq!(change.current, ReactionKind::Sad);
        assert_eq!(change.totals.like_count, 0);
    }

    #[tokio::test]
    async fn test_report_flags_at_threshold() {
        let store = MemoryBoardStore::new();
        let s = approved(&store).await;

        for voter in ["a", "b"] {
            let outcome = store
                .record_report(
                    NewReport {
                        submission_id: s.id,
                        voter: voter.to_string(),
                        reason: "es falso".to_string(),
                    },
                    policy(5, 2),
                )
                .await
                .unwrap();
            assert!(matches!(outcome, ReportOutcome::Recorded { .. }));
        }

        let submission = store.find_submission(s.id).await.unwrap().unwrap();
        assert_eq!(submission.report_count, 2);
        assert!(submission.flagged);
        assert!(store.list_feed(&FeedQuery::default()).await.unwrap().is_empty());
        assert_eq!(store.list_flagged(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_report_leaves_count_unchanged() {
        let store = MemoryBoardStore::new();
        let s = approved(&store).await;
        let report = NewReport {
            submission_id: s.id,
            voter: "v".to_string(),
            reason: "ofensivo".to_string(),
        };

        store.record_report(report.clone(), policy(5, 0)).await.unwrap();
        let second = store.record_report(report, policy(5, 0)).await.unwrap();

        assert_eq!(second, ReportOutcome::Duplicate);
        let submission = store.find_submission(s.id).await.unwrap().unwrap();
        assert_eq!(submission.report_count, 1);
        assert!(!submission.flagged);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_ledgers() {
        let store = MemoryBoardStore::new();
        let s = approved(&store).await;

        store
            .react(s.id, "v", ReactionKind::Haha, ReactionMode::Replace)
            .await
            .unwrap();
        store
            .insert_comment(NewComment {
                submission_id: s.id,
                body: "qué barbaridad".to_string(),
                nickname: None,
            })
            .await
            .unwrap();
        store
            .insert_ai_image(NewAiImage {
                submission_id: s.id,
                prompt: "parque".to_string(),
                image_url: "http://img.test/a.png".to_string(),
            })
            .await
            .unwrap();

        assert!(store.delete_submission(s.id).await.unwrap());
        assert!(!store.delete_submission(s.id).await.unwrap());

        let state = store.state.read().await;
        assert!(state.reactions.is_empty());
        assert!(state.totals.is_empty());
        assert!(state.comments.is_empty());
        assert!(state.ai_images.is_empty());
    }

    #[tokio::test]
    async fn test_approving_image_sets_submission_url() {
        let store = MemoryBoardStore::new();
        let s = approved(&store).await;
        let image = store
            .insert_ai_image(NewAiImage {
                submission_id: s.id,
                prompt: "parque".to_string(),
                image_url: "http://img.test/a.png".to_string(),
            })
            .await
            .unwrap();

        let approved_image = store
            .update_ai_image_status(
                image.id,
                AiImageStatus::Pending,
                AiImageStatus::Approved,
                Some("mod".to_string()),
            )
            .await
            .unwrap()
            .unwrap();

        assert!(approved_image.approved_at.is_some());
        let submission = store.find_submission(s.id).await.unwrap().unwrap();
        assert_eq!(submission.imagen_url.as_deref(), Some("http://img.test/a.png"));
    }

    #[tokio::test]
    async fn test_comments_newest_first_with_limit() {
        let store = MemoryBoardStore::new();
        let s = approved(&store).await;

        for body in ["uno", "dos", "tres"] {
            store
                .insert_comment(NewComment {
                    submission_id: s.id,
                    body: body.to_string(),
                    nickname: None,
                })
                .await
                .unwrap();
        }

        let comments = store.list_comments(s.id, 2).await.unwrap();
        let bodies: Vec<_> = comments.iter().map(|c| c.body.as_str()).collect();
        assert_eq!(bodies, vec!["tres", "dos"]);
    }
}
