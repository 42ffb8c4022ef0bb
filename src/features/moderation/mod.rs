//! Moderation gate: the only path that moves a submission out of `pending`.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ModerationService;
