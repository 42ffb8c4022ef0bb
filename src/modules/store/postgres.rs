use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::BoardStore;
use crate::core::error::{AppError, Result};
use crate::features::ai_images::models::{AiImage, AiImageStatus, NewAiImage};
use crate::features::comments::models::{Comment, NewComment};
use crate::features::feed::models::{FeedItem, FeedQuery};
use crate::features::reactions::models::{
    resolve_entry, ReactionChange, ReactionKind, ReactionMode, ReactionTotals,
};
use crate::features::reports::models::{NewReport, Report, ReportOutcome, ReportPolicy};
use crate::features::submissions::models::{NewSubmission, Submission, SubmissionStatus};

/// Name of the unique constraint on `reports (submission_id, voter)`
const REPORT_UNIQUE_CONSTRAINT: &str = "reports_submission_voter_unique";

/// Rebuild the totals row from the ledger and return it
const RECOMPUTE_TOTALS_SQL: &str = r#"
    INSERT INTO reaction_totals (
        submission_id, like_count, dislike_count, haha_count, wow_count, angry_count, sad_count
    )
    SELECT
        $1::uuid,
        (COUNT(*) FILTER (WHERE reaction = 'like'))::int,
        (COUNT(*) FILTER (WHERE reaction = 'dislike'))::int,
        (COUNT(*) FILTER (WHERE reaction = 'haha'))::int,
        (COUNT(*) FILTER (WHERE reaction = 'wow'))::int,
        (COUNT(*) FILTER (WHERE reaction = 'angry'))::int,
        (COUNT(*) FILTER (WHERE reaction = 'sad'))::int
    FROM reactions
    WHERE submission_id = $1
    ON CONFLICT (submission_id) DO UPDATE SET
        like_count = EXCLUDED.like_count,
        dislike_count = EXCLUDED.dislike_count,
        haha_count = EXCLUDED.haha_count,
        wow_count = EXCLUDED.wow_count,
        angry_count = EXCLUDED.angry_count,
        sad_count = EXCLUDED.sad_count,
        updated_at = NOW()
    RETURNING like_count, dislike_count, haha_count, wow_count, angry_count, sad_count
"#;

/// Postgres adapter for `BoardStore`
pub struct PgBoardStore {
    pool: PgPool,
}

impl PgBoardStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lock the submission row for the rest of the transaction and return its status
    async fn lock_submission(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Option<SubmissionStatus>> {
        let status = sqlx::query_scalar::<_, SubmissionStatus>(
            "SELECT status FROM submissions WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(status)
    }
}

fn is_report_duplicate(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.constraint())
        .is_some_and(|c| c == REPORT_UNIQUE_CONSTRAINT)
}

#[async_trait]
impl BoardStore for PgBoardStore {
    async fn insert_submission(&self, new: NewSubmission) -> Result<Submission> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submissions (category, title, content, barrio, imagen_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(new.category)
        .bind(&new.title)
        .bind(&new.content)
        .bind(&new.barrio)
        .bind(&new.imagen_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert submission: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(submission)
    }

    async fn find_submission(&self, id: Uuid) -> Result<Option<Submission>> {
        let submission =
            sqlx::query_as::<_, Submission>("SELECT * FROM submissions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(submission)
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: SubmissionStatus,
        to: SubmissionStatus,
        rejection_reason: Option<String>,
    ) -> Result<Option<Submission>> {
        let rejection_reason = match to {
            SubmissionStatus::Approved => None,
            _ => rejection_reason,
        };

        let submission = sqlx::query_as::<_, Submission>(
            r#"
            UPDATE submissions
            SET status = $3, rejection_reason = $4, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(rejection_reason)
        .fetch_optional(&self.pool)
        .await?;

        Ok(submission)
    }

    async fn delete_submission(&self, id: Uuid) -> Result<bool> {
        // reactions, totals, reports, comments and ai_images cascade
        let result = sqlx::query("DELETE FROM submissions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_status(&self, status: SubmissionStatus, limit: i64) -> Result<Vec<Submission>> {
        let submissions = sqlx::query_as::<_, Submission>(
            "SELECT * FROM submissions WHERE status = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(status)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(submissions)
    }

    async fn list_flagged(&self, limit: i64) -> Result<Vec<Submission>> {
        let submissions = sqlx::query_as::<_, Submission>(
            r#"
            SELECT * FROM submissions
            WHERE status = 'approved' AND flagged
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(submissions)
    }

    async fn react(
        &self,
        submission_id: Uuid,
        voter: &str,
        kind: ReactionKind,
        mode: ReactionMode,
    ) -> Result<Option<ReactionChange>> {
        let mut tx = self.pool.begin().await?;

        // The row lock serializes every ledger write on this submission
        let status = Self::lock_submission(&mut tx, submission_id).await?;
        if status != Some(SubmissionStatus::Approved) {
            return Ok(None);
        }

        let previous = sqlx::query_scalar::<_, ReactionKind>(
            "SELECT reaction FROM reactions WHERE submission_id = $1 AND voter = $2",
        )
        .bind(submission_id)
        .bind(voter)
        .fetch_optional(&mut *tx)
        .await?;

        let current = resolve_entry(previous, kind, mode);

        if previous != Some(current) {
            sqlx::query(
                r#"
                INSERT INTO reactions (submission_id, voter, reaction)
                VALUES ($1, $2, $3)
                ON CONFLICT (submission_id, voter)
                DO UPDATE SET reaction = EXCLUDED.reaction, updated_at = NOW()
                "#,
            )
            .bind(submission_id)
            .bind(voter)
            .bind(current)
            .execute(&mut *tx)
            .await?;
        }

        let totals = sqlx::query_as::<_, ReactionTotals>(RECOMPUTE_TOTALS_SQL)
            .bind(submission_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(ReactionChange {
            previous,
            current,
            totals,
        }))
    }

    async fn reaction_totals(&self, submission_id: Uuid) -> Result<ReactionTotals> {
        let totals = sqlx::query_as::<_, ReactionTotals>(
            r#"
            SELECT like_count, dislike_count, haha_count, wow_count, angry_count, sad_count
            FROM reaction_totals
            WHERE submission_id = $1
            "#,
        )
        .bind(submission_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(totals.unwrap_or_default())
    }

    async fn record_report(&self, new: NewReport, policy: ReportPolicy) -> Result<ReportOutcome> {
        let mut tx = self.pool.begin().await?;

        let status = Self::lock_submission(&mut tx, new.submission_id).await?;
        if status != Some(SubmissionStatus::Approved) {
            return Ok(ReportOutcome::SubmissionUnavailable);
        }

        // Serialize this voter's reports so the window count and the insert agree
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&new.voter)
            .execute(&mut *tx)
            .await?;

        let duplicate = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM reports WHERE submission_id = $1 AND voter = $2)",
        )
        .bind(new.submission_id)
        .bind(&new.voter)
        .fetch_one(&mut *tx)
        .await?;
        if duplicate {
            return Ok(ReportOutcome::Duplicate);
        }

        let in_window = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reports WHERE voter = $1 AND created_at > NOW() - INTERVAL '1 hour'",
        )
        .bind(&new.voter)
        .fetch_one(&mut *tx)
        .await?;
        if policy.is_rate_limited(in_window) {
            return Ok(ReportOutcome::RateLimited);
        }

        let inserted = sqlx::query(
            "INSERT INTO reports (submission_id, voter, reason) VALUES ($1, $2, $3)",
        )
        .bind(new.submission_id)
        .bind(&new.voter)
        .bind(&new.reason)
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            Err(e) if is_report_duplicate(&e) => return Ok(ReportOutcome::Duplicate),
            Err(e) => return Err(AppError::Database(e)),
        }

        let (report_count, mut flagged) = sqlx::query_as::<_, (i32, bool)>(
            r#"
            UPDATE submissions
            SET report_count = report_count + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING report_count, flagged
            "#,
        )
        .bind(new.submission_id)
        .fetch_one(&mut *tx)
        .await?;

        if !flagged && policy.should_flag(report_count) {
            sqlx::query("UPDATE submissions SET flagged = TRUE WHERE id = $1")
                .bind(new.submission_id)
                .execute(&mut *tx)
                .await?;
            flagged = true;
        }

        tx.commit().await?;

        Ok(ReportOutcome::Recorded {
            report_count,
            flagged,
        })
    }

    async fn list_reports(&self, submission_id: Uuid, limit: i64) -> Result<Vec<Report>> {
        let reports = sqlx::query_as::<_, Report>(
            "SELECT * FROM reports WHERE submission_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(submission_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(reports)
    }

    async fn insert_comment(&self, new: NewComment) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (submission_id, body, nickname)
            SELECT $1::uuid, $2::text, $3::text
            FROM submissions
            WHERE id = $1 AND status = 'approved'
            RETURNING *
            "#,
        )
        .bind(new.submission_id)
        .bind(&new.body)
        .bind(&new.nickname)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn list_comments(&self, submission_id: Uuid, limit: i64) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE submission_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(submission_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn list_feed(&self, query: &FeedQuery) -> Result<Vec<FeedItem>> {
        let sql = format!(
            r#"
            SELECT
                s.id, s.category, s.title, s.content, s.barrio, s.imagen_url, s.created_at,
                COALESCE(t.like_count, 0) AS like_count,
                COALESCE(t.dislike_count, 0) AS dislike_count,
                COALESCE(t.haha_count, 0) AS haha_count,
                COALESCE(t.wow_count, 0) AS wow_count,
                COALESCE(t.angry_count, 0) AS angry_count,
                COALESCE(t.sad_count, 0) AS sad_count,
                COALESCE(c.comment_count, 0) AS comment_count
            FROM submissions s
            LEFT JOIN reaction_totals t ON t.submission_id = s.id
            LEFT JOIN (
                SELECT submission_id, COUNT(*) AS comment_count
                FROM comments
                GROUP BY submission_id
            ) c ON c.submission_id = s.id
            WHERE s.status = 'approved'
              AND NOT s.flagged
              AND ($1::submission_category IS NULL OR s.category = $1)
              AND ($2::text IS NULL OR LOWER(s.barrio) = LOWER($2))
              AND ($3::timestamptz IS NULL OR s.created_at >= $3)
              AND ($4::timestamptz IS NULL OR s.created_at < $4)
            ORDER BY {}
            LIMIT $5
            "#,
            query.sort.order_by_sql()
        );

        let items = sqlx::query_as::<_, FeedItem>(&sql)
            .bind(query.category)
            .bind(&query.barrio)
            .bind(query.created_from)
            .bind(query.created_to)
            .bind(query.limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    async fn insert_ai_image(&self, new: NewAiImage) -> Result<AiImage> {
        let image = sqlx::query_as::<_, AiImage>(
            r#"
            INSERT INTO ai_images (submission_id, prompt, image_url)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(new.submission_id)
        .bind(&new.prompt)
        .bind(&new.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(image)
    }

    async fn find_ai_image(&self, id: Uuid) -> Result<Option<AiImage>> {
        let image = sqlx::query_as::<_, AiImage>("SELECT * FROM ai_images WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(image)
    }

    async fn list_ai_images(&self, status: AiImageStatus, limit: i64) -> Result<Vec<AiImage>> {
        let images = sqlx::query_as::<_, AiImage>(
            "SELECT * FROM ai_images WHERE status = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(status)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    async fn update_ai_image_status(
        &self,
        id: Uuid,
        from: AiImageStatus,
        to: AiImageStatus,
        approved_by: Option<String>,
    ) -> Result<Option<AiImage>> {
        let mut tx = self.pool.begin().await?;

        let image = match to {
            AiImageStatus::Approved => {
                sqlx::query_as::<_, AiImage>(
                    r#"
                    UPDATE ai_images
                    SET status = $3, approved_at = NOW(), approved_by = $4
                    WHERE id = $1 AND status = $2
                    RETURNING *
                    "#,
                )
                .bind(id)
                .bind(from)
                .bind(to)
                .bind(approved_by)
                .fetch_optional(&mut *tx)
                .await?
            }
            _ => {
                sqlx::query_as::<_, AiImage>(
                    "UPDATE ai_images SET status = $3 WHERE id = $1 AND status = $2 RETURNING *",
                )
                .bind(id)
                .bind(from)
                .bind(to)
                .fetch_optional(&mut *tx)
                .await?
            }
        };

        let Some(image) = image else {
            return Ok(None);
        };

        if image.status == AiImageStatus::Approved {
            sqlx::query("UPDATE submissions SET imagen_url = $2, updated_at = NOW() WHERE id = $1")
                .bind(image.submission_id)
                .bind(&image.image_url)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(Some(image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::submissions::models::Category;
    use std::sync::Arc;

    fn policy(max_per_hour: i64, flag_threshold: i32) -> ReportPolicy {
        ReportPolicy {
            max_per_hour,
            flag_threshold,
        }
    }

    fn report(submission_id: Uuid, voter: &str) -> NewReport {
        NewReport {
            submission_id,
            voter: voter.to_string(),
            reason: "Información falsa".to_string(),
        }
    }

    async fn approved(store: &PgBoardStore) -> Submission {
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

    #[sqlx::test(migrations = "./migrations")]
    async fn test_same_reaction_twice_counts_once(pool: PgPool) {
        let store = PgBoardStore::new(pool);
        let s = approved(&store).await;

        for _ in 0..2 {
            store
                .react(s.id, "v1", ReactionKind::Like, ReactionMode::Replace)
                .await
                .unwrap()
                .unwrap();
        }

        let totals = store.reaction_totals(s.id).await.unwrap();
        assert_eq!(totals.like_count, 1);
        assert_eq!(totals.total(), 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_replacement_moves_the_count(pool: PgPool) {
        let store = PgBoardStore::new(pool);
        let s = approved(&store).await;

        store
            .react(s.id, "v1", ReactionKind::Like, ReactionMode::Replace)
            .await
            .unwrap();
        let change = store
            .react(s.id, "v1", ReactionKind::Wow, ReactionMode::Replace)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(change.previous, Some(ReactionKind::Like));
        assert_eq!(change.current, ReactionKind::Wow);
        assert_eq!(change.totals.like_count, 0);
        assert_eq!(change.totals.wow_count, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_keep_existing_leaves_prior_reaction(pool: PgPool) {
        let store = PgBoardStore::new(pool);
        let s = approved(&store).await;

        store
            .react(s.id, "v1", ReactionKind::Sad, ReactionMode::Replace)
            .await
            .unwrap();
        let change = store
            .react(s.id, "v1", ReactionKind::Like, ReactionMode::KeepExisting)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(change.current, ReactionKind::Sad);
        assert_eq!(change.totals.sad_count, 1);
        assert_eq!(change.totals.like_count, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_concurrent_voters_keep_totals_in_sync(pool: PgPool) {
        let store = Arc::new(PgBoardStore::new(pool.clone()));
        let id = approved(&store).await.id;

        let mut handles = Vec::new();
        for i in 0..20 {
            for _ in 0..2 {
                let store = store.clone();
                let voter = format!("voter-{i}");
                handles.push(tokio::spawn(async move {
                    store
                        .react(id, &voter, ReactionKind::Like, ReactionMode::Replace)
                        .await
                }));
            }
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let totals = store.reaction_totals(id).await.unwrap();
        assert_eq!(totals.like_count, 20);

        let ledger = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reactions WHERE submission_id = $1",
        )
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(ledger, 20);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_duplicate_report_is_not_counted(pool: PgPool) {
        let store = PgBoardStore::new(pool);
        let s = approved(&store).await;

        let first = store.record_report(report(s.id, "v1"), policy(5, 0)).await.unwrap();
        let second = store.record_report(report(s.id, "v1"), policy(5, 0)).await.unwrap();

        assert_eq!(
            first,
            ReportOutcome::Recorded {
                report_count: 1,
                flagged: false
            }
        );
        assert_eq!(second, ReportOutcome::Duplicate);
        let stored = store.find_submission(s.id).await.unwrap().unwrap();
        assert_eq!(stored.report_count, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_rate_limit_spans_submissions(pool: PgPool) {
        let store = PgBoardStore::new(pool);
        let a = approved(&store).await;
        let b = approved(&store).await;
        let c = approved(&store).await;

        for s in [&a, &b] {
            let outcome = store.record_report(report(s.id, "v1"), policy(2, 0)).await.unwrap();
            assert!(matches!(outcome, ReportOutcome::Recorded { .. }));
        }
        let third = store.record_report(report(c.id, "v1"), policy(2, 0)).await.unwrap();
        assert_eq!(third, ReportOutcome::RateLimited);

        let stored = store.find_submission(c.id).await.unwrap().unwrap();
        assert_eq!(stored.report_count, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_threshold_flags_and_hides_from_feed(pool: PgPool) {
        let store = PgBoardStore::new(pool);
        let reported = approved(&store).await;
        let untouched = approved(&store).await;

        let feed = store.list_feed(&FeedQuery::default()).await.unwrap();
        assert_eq!(feed.len(), 2);
        assert!(feed.iter().all(|item| item.totals.total() == 0 && item.comment_count == 0));

        store
            .record_report(report(reported.id, "v1"), policy(5, 2))
            .await
            .unwrap();
        let second = store
            .record_report(report(reported.id, "v2"), policy(5, 2))
            .await
            .unwrap();
        assert_eq!(
            second,
            ReportOutcome::Recorded {
                report_count: 2,
                flagged: true
            }
        );

        let feed = store.list_feed(&FeedQuery::default()).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, untouched.id);
        assert_eq!(store.list_flagged(10).await.unwrap().len(), 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_cascades_to_ledgers_and_comments(pool: PgPool) {
        let store = PgBoardStore::new(pool.clone());
        let s = approved(&store).await;

        store
            .react(s.id, "v1", ReactionKind::Haha, ReactionMode::Replace)
            .await
            .unwrap();
        store.record_report(report(s.id, "v1"), policy(5, 0)).await.unwrap();
        store
            .insert_comment(NewComment {
                submission_id: s.id,
                body: "Yo también lo escuché".to_string(),
                nickname: None,
            })
            .await
            .unwrap()
            .unwrap();

        assert!(store.delete_submission(s.id).await.unwrap());
        assert!(!store.delete_submission(s.id).await.unwrap());

        assert!(store.list_comments(s.id, 10).await.unwrap().is_empty());
        assert!(store.list_reports(s.id, 10).await.unwrap().is_empty());
        assert_eq!(
            store.reaction_totals(s.id).await.unwrap(),
            ReactionTotals::default()
        );
        let ledger = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reactions WHERE submission_id = $1",
        )
        .bind(s.id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(ledger, 0);
    }
}
