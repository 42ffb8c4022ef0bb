/// Public feed page size and hard cap (no cursor pagination)
pub const FEED_LIMIT: i64 = 100;

/// Size of the "top" list
pub const TOP_LIMIT: i64 = 10;

/// Trailing window, in days, considered by the "top" list
pub const TOP_WINDOW_DAYS: i64 = 30;

/// Moderation queues (pending, flagged) cap
pub const MODERATION_QUEUE_LIMIT: i64 = 200;

/// Default number of comments returned per request
pub const DEFAULT_COMMENT_LIMIT: i64 = 30;

/// Maximum number of comments returned per request
pub const MAX_COMMENT_LIMIT: i64 = 100;

/// Upper bound on client-chosen voter ids
pub const VOTER_MAX_CHARS: usize = 100;

/// Characters of content kept in the webhook preview
pub const WEBHOOK_PREVIEW_CHARS: usize = 200;
