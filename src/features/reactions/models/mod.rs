mod reaction;

pub use reaction::{resolve_entry, ReactionChange, ReactionKind, ReactionMode, ReactionTotals};
