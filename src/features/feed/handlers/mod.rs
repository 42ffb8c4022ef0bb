mod feed_handler;

pub use feed_handler::*;
