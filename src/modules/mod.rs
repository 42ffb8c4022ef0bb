//! Modules layer - Infrastructure components for external integrations
//!
//! Persistence adapters, object storage, image generation and chat webhooks.

pub mod image_gen;
pub mod notifier;
pub mod storage;
pub mod store;
