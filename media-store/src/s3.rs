//! S3-compatible media backend (MinIO or AWS)
//!
//! Enabled with the `s3-backend` feature.

use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{MediaError, MediaResult};
use crate::{extension_for, MediaStore, StoredMedia};

/// S3 backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct S3Config {
    pub endpoint: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub public_base_url: String,
    pub use_path_style: bool,
}

impl S3Config {
    /// Load S3 configuration from environment variables
    pub fn from_env() -> MediaResult<Self> {
        Ok(Self {
            endpoint: std::env::var("S3_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:9000".to_string()),
            region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            access_key: std::env::var("S3_ACCESS_KEY")
                .map_err(|_| MediaError::Configuration("S3_ACCESS_KEY is not set".to_string()))?,
            secret_key: std::env::var("S3_SECRET_KEY")
                .map_err(|_| MediaError::Configuration("S3_SECRET_KEY is not set".to_string()))?,
            bucket: std::env::var("S3_MEDIA_BUCKET")
                .unwrap_or_else(|_| "eventline-media".to_string()),
            public_base_url: std::env::var("S3_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:9000/eventline-media".to_string()),
            use_path_style: std::env::var("S3_USE_PATH_STYLE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
        })
    }
}

pub struct S3MediaStore {
    client: Client,
    config: S3Config,
}

impl S3MediaStore {
    pub async fn new(config: S3Config) -> MediaResult<Self> {
        info!(
            endpoint = %config.endpoint,
            bucket = %config.bucket,
            "Initializing S3 media store"
        );

        let credentials = aws_sdk_s3::config::Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "eventline-s3",
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(config.region.clone()))
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .endpoint_url(&config.endpoint)
            .force_path_style(config.use_path_style)
            .build();

        Ok(Self {
            client: Client::from_conf(s3_config),
            config,
        })
    }
}

#[async_trait::async_trait]
impl MediaStore for S3MediaStore {
    async fn store(&self, data: &[u8], content_type: &str) -> MediaResult<StoredMedia> {
        let media_ref = format!("{}.{}", Uuid::new_v4(), extension_for(content_type));

        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&media_ref)
            .content_type(content_type)
            .body(ByteStream::from(data.to_vec()))
            .send()
            .await
            .map_err(|e| MediaError::Storage(format!("S3 put failed: {e}")))?;

        debug!(media_ref = %media_ref, size = data.len(), "Stored media object in S3");

        Ok(StoredMedia {
            url: format!(
                "{}/{}",
                self.config.public_base_url.trim_end_matches('/'),
                media_ref
            ),
            media_ref,
            size: data.len() as u64,
            content_type: content_type.to_string(),
            created_at: Utc::now(),
        })
    }

    async fn release(&self, media_ref: &str) -> MediaResult<()> {
        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(media_ref)
            .send()
            .await
            .map_err(|e| MediaError::Storage(format!("S3 delete failed: {e}")))?;

        debug!(media_ref = %media_ref, "Released media object from S3");
        Ok(())
    }
}
