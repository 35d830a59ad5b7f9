//! Media storage collaborator for Eventline Engine
//!
//! Event images live outside the event document: the core stores only an
//! opaque reference and a public URL, and releases the reference when the
//! image is replaced or the event is deleted. This crate provides the
//! [`MediaStore`] trait plus a filesystem backend; an S3 backend is
//! available behind the `s3-backend` feature.

pub mod error;
pub mod filesystem;
pub mod memory;
#[cfg(feature = "s3-backend")]
pub mod s3;

pub use error::{MediaError, MediaResult};
pub use filesystem::FileSystemMediaStore;
pub use memory::MemoryMediaStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored media object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMedia {
    /// Publicly servable URL
    pub url: String,
    /// Opaque reference used to release the object later
    pub media_ref: String,
    pub size: u64,
    pub content_type: String,
    pub created_at: DateTime<Utc>,
}

/// Storage backend for event media
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store a binary object and return its durable URL and reference
    async fn store(&self, data: &[u8], content_type: &str) -> MediaResult<StoredMedia>;

    /// Release a previously stored object
    ///
    /// Callers treat failures as non-fatal: an orphaned object is logged,
    /// never allowed to abort the owning event mutation.
    async fn release(&self, media_ref: &str) -> MediaResult<()>;
}

/// File extension for a handful of image content types
pub(crate) fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/jpeg" | "image/jpg" => "jpg",
        _ => "bin",
    }
}
