//! Object storage for generated images

mod minio_client;

pub use minio_client::MinIOClient;

use async_trait::async_trait;

use crate::core::error::AppError;

/// Write-only view of a bucket whose objects are publicly readable
#[async_trait]
pub trait PublicObjectStore: Send + Sync {
    /// Store `data` under the public prefix and return its public URL
    async fn put_public(
        &self,
        path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError>;
}
