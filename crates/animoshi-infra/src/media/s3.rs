//! S3 media store.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use uuid::Uuid;

use animoshi_core::ports::{MediaError, MediaStore, Upload};

/// S3 bucket and the public https origin serving it.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub public_base_url: String,
}

impl S3Config {
    /// `None` when `S3_BUCKET` is not set; uploads are then disabled.
    pub fn from_env() -> Option<Self> {
        let bucket = std::env::var("S3_BUCKET").ok()?;
        let public_base_url = std::env::var("S3_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("https://{bucket}.s3.amazonaws.com"));
        Some(Self {
            bucket,
            public_base_url,
        })
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), key)
    }
}

/// Unique object key: `<uuid>-<filename>`, with path separators and spaces replaced.
fn object_key(filename: &str) -> String {
    let name: String = filename
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ' ') { '_' } else { c })
        .collect();
    format!("{}-{}", Uuid::new_v4(), name)
}

pub struct S3MediaStore {
    client: Client,
    config: S3Config,
}

impl S3MediaStore {
    pub fn new(client: Client, config: S3Config) -> Self {
        Self { client, config }
    }

    /// Region and credentials come from the standard AWS environment.
    pub async fn from_config(config: S3Config) -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        tracing::info!(bucket = %config.bucket, "S3 media store configured");
        Self::new(Client::new(&aws_config), config)
    }
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn upload(&self, upload: Upload) -> Result<String, MediaError> {
        let key = object_key(&upload.filename);

        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&key)
            .content_type(&upload.content_type)
            .body(ByteStream::from(upload.bytes))
            .send()
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))?;

        Ok(self.config.public_url(&key))
    }
}
