use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::feed::dtos::{FeedItemDto, FeedQueryParams};
use crate::features::feed::models::{FeedQuery, FeedSort};
use crate::features::submissions::models::Category;
use crate::modules::store::BoardStore;
use crate::shared::constants::{TOP_LIMIT, TOP_WINDOW_DAYS};
use crate::shared::validation::trim_to_option;

/// Read side of the board
pub struct FeedService {
    store: Arc<dyn BoardStore>,
}

impl FeedService {
    pub fn new(store: Arc<dyn BoardStore>) -> Self {
        Self { store }
    }

    /// Approved, unflagged submissions with their counters
    pub async fn list_approved(&self, params: FeedQueryParams) -> Result<Vec<FeedItemDto>> {
        let sort = match params.sort.as_deref() {
            Some(s) => s.parse::<FeedSort>()?,
            None => FeedSort::default(),
        };
        let category = trim_to_option(params.category.clone())
            .map(|c| c.parse::<Category>())
            .transpose()?;

        let query = FeedQuery {
            category,
            barrio: trim_to_option(params.barrio.clone()),
            sort,
            limit: params.effective_limit(),
            ..Default::default()
        };

        let items = self.store.list_feed(&query).await?;
        Ok(items.into_iter().map(Into::into).collect())
    }

    /// Highest score over the trailing window
    pub async fn list_top(&self) -> Result<Vec<FeedItemDto>> {
        let query = FeedQuery {
            created_from: Some(Utc::now() - Duration::days(TOP_WINDOW_DAYS)),
            sort: FeedSort::Score,
            limit: TOP_LIMIT,
            ..Default::default()
        };

        let items = self.store.list_feed(&query).await?;
        Ok(items.into_iter().map(Into::into).collect())
    }
}
