use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::cmp::Ordering;
use std::str::FromStr;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::reactions::models::ReactionTotals;
use crate::features::submissions::models::Category;
use crate::shared::constants::FEED_LIMIT;

/// Feed ordering. Ties always fall back to `created_at` descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeedSort {
    /// Newest first
    #[default]
    Recent,
    /// Sum of the six reaction counters
    Engagement,
    /// Number of comments
    Comments,
    /// Legacy upvote score
    Score,
}

impl FeedSort {
    /// ORDER BY clause for the feed query
    pub fn order_by_sql(&self) -> &'static str {
        match self {
            FeedSort::Recent => "s.created_at DESC",
            FeedSort::Engagement => {
                "(COALESCE(t.like_count, 0) + COALESCE(t.dislike_count, 0) \
                 + COALESCE(t.haha_count, 0) + COALESCE(t.wow_count, 0) \
                 + COALESCE(t.angry_count, 0) + COALESCE(t.sad_count, 0)) DESC, s.created_at DESC"
            }
            FeedSort::Comments => "COALESCE(c.comment_count, 0) DESC, s.created_at DESC",
            FeedSort::Score => "COALESCE(t.like_count, 0) DESC, s.created_at DESC",
        }
    }

    /// Same ordering as `order_by_sql`, for in-process sorting
    pub fn compare(&self, a: &FeedItem, b: &FeedItem) -> Ordering {
        let primary = match self {
            FeedSort::Recent => Ordering::Equal,
            FeedSort::Engagement => b.totals.total().cmp(&a.totals.total()),
            FeedSort::Comments => b.comment_count.cmp(&a.comment_count),
            FeedSort::Score => b.totals.score().cmp(&a.totals.score()),
        };
        primary.then_with(|| b.created_at.cmp(&a.created_at))
    }
}

impl FromStr for FeedSort {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "recent" => Ok(FeedSort::Recent),
            "engagement" => Ok(FeedSort::Engagement),
            "comments" => Ok(FeedSort::Comments),
            "score" | "top" => Ok(FeedSort::Score),
            _ => Err(AppError::Validation("Orden inválido".to_string())),
        }
    }
}

/// Filters and ordering for one feed read.
///
/// The feed only ever contains approved, unflagged submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub category: Option<Category>,
    /// Case-insensitive exact match
    pub barrio: Option<String>,
    /// Inclusive lower bound on `created_at`
    pub created_from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `created_at`
    pub created_to: Option<DateTime<Utc>>,
    pub sort: FeedSort,
    pub limit: i64,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            category: None,
            barrio: None,
            created_from: None,
            created_to: None,
            sort: FeedSort::Recent,
            limit: FEED_LIMIT,
        }
    }
}

impl FeedQuery {
    /// Whether a submission with these attributes passes the filters
    pub fn matches(&self, category: Category, barrio: Option<&str>, created_at: DateTime<Utc>) -> bool {
        if self.category.is_some_and(|c| c != category) {
            return false;
        }
        if let Some(wanted) = &self.barrio {
            match barrio {
                Some(b) if b.to_lowercase() == wanted.to_lowercase() => {}
                _ => return false,
            }
        }
        if self.created_from.is_some_and(|from| created_at < from) {
            return false;
        }
        if self.created_to.is_some_and(|to| created_at >= to) {
            return false;
        }
        true
    }
}

/// Approved submission joined with its zero-filled aggregates
#[derive(Debug, Clone, FromRow)]
pub struct FeedItem {
    pub id: Uuid,
    pub category: Category,
    pub title: String,
    pub content: String,
    pub barrio: Option<String>,
    pub imagen_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub totals: ReactionTotals,
    pub comment_count: i64,
}
