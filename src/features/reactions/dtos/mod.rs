mod reaction_dto;

pub use reaction_dto::{ReactDto, ReactionTotalsResponseDto, VoteDto, VoteResponseDto};
