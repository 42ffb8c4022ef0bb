//! Review queue for AI-generated illustrations, kept apart from the
//! submission gate and guarded by its own bearer token.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::AiImageService;
