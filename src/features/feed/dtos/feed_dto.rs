use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::feed::models::FeedItem;
use crate::features::reactions::models::ReactionTotals;
use crate::features::submissions::models::Category;
use crate::shared::constants::FEED_LIMIT;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeedQueryParams {
    /// `recent` (default), `engagement` or `comments`
    pub sort: Option<String>,
    /// `RUMOR` or `REPORTE`
    pub category: Option<String>,
    /// Neighborhood, case-insensitive
    pub barrio: Option<String>,
    /// Page size, 1 to 100 (default 100)
    pub limit: Option<i64>,
}

impl FeedQueryParams {
    pub fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(FEED_LIMIT).clamp(1, FEED_LIMIT)
    }
}

/// Public feed entry with its counters inlined
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedItemDto {
    pub id: Uuid,
    pub category: Category,
    pub title: String,
    pub content: String,
    pub barrio: Option<String>,
    pub imagen_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub totals: ReactionTotals,
    /// Legacy upvote score
    pub score: i32,
    pub comment_count: i64,
}

impl From<FeedItem> for FeedItemDto {
    fn from(item: FeedItem) -> Self {
        Self {
            id: item.id,
            category: item.category,
            title: item.title,
            content: item.content,
            barrio: item.barrio,
            imagen_url: item.imagen_url,
            created_at: item.created_at,
            score: item.totals.score(),
            totals: item.totals,
            comment_count: item.comment_count,
        }
    }
}
