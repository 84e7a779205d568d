//! Blob storage port for post images.

use async_trait::async_trait;

/// A file received from a client, already read into memory.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Stores uploaded images and hands back a durable https URL.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, upload: Upload) -> Result<String, MediaError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Media storage not configured")]
    NotConfigured,
}
