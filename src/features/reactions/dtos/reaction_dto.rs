use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::reactions::models::ReactionTotals;

/// Request DTO for reacting to a submission
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReactDto {
    /// Submission id
    pub id: Uuid,
    /// Opaque client-generated voter id
    #[serde(default)]
    pub voter: String,
    /// like, dislike, haha, wow, angry or sad
    #[serde(default)]
    #[schema(example = "like")]
    pub reaction: String,
}

/// Request DTO for the legacy upvote
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VoteDto {
    pub id: Uuid,
    #[serde(default)]
    pub voter: String,
}

/// Totals snapshot returned after a reaction
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReactionTotalsResponseDto {
    pub totals: ReactionTotals,
}

/// Legacy upvote result
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VoteResponseDto {
    /// Current score of the submission
    pub score: i32,
    /// False when this voter had already reacted or voted
    pub counted: bool,
}
