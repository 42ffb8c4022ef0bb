//! Text-to-image generation

mod cloudflare;

pub use cloudflare::CloudflareImageGenerator;

use async_trait::async_trait;

use crate::core::error::AppError;

/// Turns a prompt into PNG bytes
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, AppError>;
}
