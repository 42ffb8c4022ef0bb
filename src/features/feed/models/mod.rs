mod feed;

pub use feed::{FeedItem, FeedQuery, FeedSort};
