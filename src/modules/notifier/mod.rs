//! Outbound chat notifications

mod discord;

pub use discord::{DiscordNotifier, PingReport};
