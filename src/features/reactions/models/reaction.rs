use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::str::FromStr;
use utoipa::ToSchema;

use crate::core::error::AppError;

/// Reaction kind enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "reaction_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
    Haha,
    Wow,
    Angry,
    Sad,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 6] = [
        ReactionKind::Like,
        ReactionKind::Dislike,
        ReactionKind::Haha,
        ReactionKind::Wow,
        ReactionKind::Angry,
        ReactionKind::Sad,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Like => "like",
            ReactionKind::Dislike => "dislike",
            ReactionKind::Haha => "haha",
            ReactionKind::Wow => "wow",
            ReactionKind::Angry => "angry",
            ReactionKind::Sad => "sad",
        }
    }
}

impl std::fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ReactionKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::Validation("Reacción inválida".to_string()))
    }
}

/// Per-submission aggregate of the reaction ledger, one counter per kind.
///
/// A submission without any reaction has all counters at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ReactionTotals {
    pub like_count: i32,
    pub dislike_count: i32,
    pub haha_count: i32,
    pub wow_count: i32,
    pub angry_count: i32,
    pub sad_count: i32,
}

impl ReactionTotals {
    pub fn get(&self, kind: ReactionKind) -> i32 {
        match kind {
            ReactionKind::Like => self.like_count,
            ReactionKind::Dislike => self.dislike_count,
            ReactionKind::Haha => self.haha_count,
            ReactionKind::Wow => self.wow_count,
            ReactionKind::Angry => self.angry_count,
            ReactionKind::Sad => self.sad_count,
        }
    }

    fn slot(&mut self, kind: ReactionKind) -> &mut i32 {
        match kind {
            ReactionKind::Like => &mut self.like_count,
            ReactionKind::Dislike => &mut self.dislike_count,
            ReactionKind::Haha => &mut self.haha_count,
            ReactionKind::Wow => &mut self.wow_count,
            ReactionKind::Angry => &mut self.angry_count,
            ReactionKind::Sad => &mut self.sad_count,
        }
    }

    /// Apply a ledger transition: `previous` loses one, `current` gains one
    pub fn apply(&mut self, previous: Option<ReactionKind>, current: ReactionKind) {
        if previous == Some(current) {
            return;
        }
        if let Some(previous) = previous {
            let slot = self.slot(previous);
            debug_assert!(*slot > 0, "totals out of sync with the ledger");
            *slot -= 1;
        }
        *self.slot(current) += 1;
    }

    /// Sum of all six counters
    pub fn total(&self) -> i64 {
        ReactionKind::ALL
            .iter()
            .map(|k| i64::from(self.get(*k)))
            .sum()
    }

    /// Legacy single-dimension score. Upvotes live in the ledger as likes.
    pub fn score(&self) -> i32 {
        self.like_count
    }
}

/// How a ledger write treats a voter's existing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionMode {
    /// Overwrite a different prior kind; the same kind is a no-op
    Replace,
    /// Only insert when the voter has no entry yet (legacy upvote)
    KeepExisting,
}

/// Result of one atomic ledger write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionChange {
    /// The voter's entry before the call
    pub previous: Option<ReactionKind>,
    /// The voter's entry after the call
    pub current: ReactionKind,
    /// Totals snapshot taken inside the same atomic operation
    pub totals: ReactionTotals,
}

impl ReactionChange {
    /// Whether the call inserted a brand-new ledger entry
    pub fn is_new_entry(&self) -> bool {
        self.previous.is_none()
    }
}

/// Decide what a write leaves in the ledger for this voter
pub fn resolve_entry(
    previous: Option<ReactionKind>,
    requested: ReactionKind,
    mode: ReactionMode,
) -> ReactionKind {
    match (mode, previous) {
        (ReactionMode::KeepExisting, Some(existing)) => existing,
        _ => requested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!("WOW".parse::<ReactionKind>().unwrap(), ReactionKind::Wow);
        assert_eq!(" sad".parse::<ReactionKind>().unwrap(), ReactionKind::Sad);
        assert!("love".parse::<ReactionKind>().is_err());
        assert!("".parse::<ReactionKind>().is_err());
    }

    #[test]
    fn test_apply_same_kind_is_noop() {
        let mut totals = ReactionTotals::default();
        totals.apply(None, ReactionKind::Like);
        totals.apply(Some(ReactionKind::Like), ReactionKind::Like);
        assert_eq!(totals.like_count, 1);
        assert_eq!(totals.total(), 1);
    }

    #[test]
    fn test_apply_replacement_moves_one_count() {
        let mut totals = ReactionTotals::default();
        totals.apply(None, ReactionKind::Like);
        totals.apply(Some(ReactionKind::Like), ReactionKind::Wow);
        assert_eq!(totals.like_count, 0);
        assert_eq!(totals.wow_count, 1);
        assert_eq!(totals.total(), 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "totals out of sync")]
    fn test_apply_panics_when_totals_lag_ledger() {
        let mut totals = ReactionTotals::default();
        totals.apply(Some(ReactionKind::Like), ReactionKind::Wow);
    }

    #[test]
    fn test_score_follows_likes() {
        let mut totals = ReactionTotals::default();
        totals.apply(None, ReactionKind::Like);
        totals.apply(None, ReactionKind::Like);
        totals.apply(None, ReactionKind::Angry);
        assert_eq!(totals.like_count, 2);
        assert_eq!(totals.angry_count, 1);
        assert_eq!(totals.score(), 2);
    }

    #[test]
    fn test_resolve_entry_keep_existing() {
        assert_eq!(
            resolve_entry(Some(ReactionKind::Sad), ReactionKind::Like, ReactionMode::KeepExisting),
            ReactionKind::Sad
        );
        assert_eq!(
            resolve_entry(None, ReactionKind::Like, ReactionMode::KeepExisting),
            ReactionKind::Like
        );
        assert_eq!(
            resolve_entry(Some(ReactionKind::Sad), ReactionKind::Like, ReactionMode::Replace),
            ReactionKind::Like
        );
    }

    #[test]
    fn test_totals_serialize_with_count_suffix() {
        let json = serde_json::to_value(ReactionTotals::default()).unwrap();
        for kind in ReactionKind::ALL {
            assert_eq!(json[format!("{}_count", kind)], 0);
        }
    }
}
