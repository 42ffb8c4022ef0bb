pub mod ai_images;
pub mod comments;
pub mod feed;
pub mod moderation;
pub mod reactions;
pub mod reports;
pub mod submissions;
