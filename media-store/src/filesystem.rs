//! File system media backend
//!
//! Objects are written under `<base>/objects/<uuid>.<ext>` and served from
//! a configurable public base URL (typically a static-file route or a CDN
//! prefix pointing at the same directory).

use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{MediaError, MediaResult};
use crate::{extension_for, MediaStore, StoredMedia};

pub struct FileSystemMediaStore {
    base_path: PathBuf,
    public_base_url: String,
}

impl FileSystemMediaStore {
    pub fn new(base_path: impl AsRef<Path>, public_base_url: impl Into<String>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Create the storage directory structure
    pub async fn initialize(&self) -> MediaResult<()> {
        let objects = self.base_path.join("objects");
        fs::create_dir_all(&objects).await.map_err(|e| {
            MediaError::Storage(format!("Failed to create objects directory: {e}"))
        })?;
        info!(path = %self.base_path.display(), "Media storage initialized");
        Ok(())
    }

    fn object_path(&self, media_ref: &str) -> MediaResult<PathBuf> {
        // Refs are generated by this backend; reject anything that could
        // escape the objects directory.
        if media_ref.contains('/') || media_ref.contains("..") {
            return Err(MediaError::NotFound(media_ref.to_string()));
        }
        Ok(self.base_path.join("objects").join(media_ref))
    }
}

#[async_trait::async_trait]
impl MediaStore for FileSystemMediaStore {
    async fn store(&self, data: &[u8], content_type: &str) -> MediaResult<StoredMedia> {
        let media_ref = format!("{}.{}", Uuid::new_v4(), extension_for(content_type));
        let path = self.object_path(&media_ref)?;

        fs::write(&path, data)
            .await
            .map_err(|e| MediaError::Storage(format!("Failed to write object: {e}")))?;

        debug!(media_ref = %media_ref, size = data.len(), "Stored media object");

        Ok(StoredMedia {
            url: format!("{}/{}", self.public_base_url.trim_end_matches('/'), media_ref),
            media_ref,
            size: data.len() as u64,
            content_type: content_type.to_string(),
            created_at: Utc::now(),
        })
    }

    async fn release(&self, media_ref: &str) -> MediaResult<()> {
        let path = self.object_path(media_ref)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(media_ref = %media_ref, "Released media object");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(MediaError::NotFound(media_ref.to_string()))
            }
            Err(e) => Err(MediaError::Storage(format!(
                "Failed to remove object: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_then_release_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemMediaStore::new(dir.path(), "http://localhost:8080/media");
        store.initialize().await.unwrap();

        let stored = store.store(b"fake-png-bytes", "image/png").await.unwrap();
        assert!(stored.media_ref.ends_with(".png"));
        assert!(stored.url.ends_with(&stored.media_ref));
        assert_eq!(stored.size, 14);

        store.release(&stored.media_ref).await.unwrap();
        assert!(matches!(
            store.release(&stored.media_ref).await,
            Err(MediaError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn release_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSystemMediaStore::new(dir.path(), "http://localhost:8080/media");
        store.initialize().await.unwrap();

        assert!(matches!(
            store.release("../objects/escape.png").await,
            Err(MediaError::NotFound(_))
        ));
    }
}
