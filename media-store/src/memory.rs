//! In-memory media backend for tests
//!
//! Records every stored object and every release so tests can assert that a
//! reference was released exactly once.

use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{MediaError, MediaResult};
use crate::{extension_for, MediaStore, StoredMedia};

#[derive(Default)]
pub struct MemoryMediaStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    released: Mutex<Vec<String>>,
    fail_release: Mutex<bool>,
}

impl MemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refs released so far, in order
    pub fn released(&self) -> Vec<String> {
        self.released.lock().clone()
    }

    /// Register a ref without going through `store`, for seeding tests
    pub fn seed(&self, media_ref: &str) {
        self.objects
            .lock()
            .insert(media_ref.to_string(), Vec::new());
    }

    /// Make subsequent `release` calls fail, to exercise the
    /// log-and-continue path in callers
    pub fn fail_releases(&self) {
        *self.fail_release.lock() = true;
    }
}

#[async_trait::async_trait]
impl MediaStore for MemoryMediaStore {
    async fn store(&self, data: &[u8], content_type: &str) -> MediaResult<StoredMedia> {
        let media_ref = format!("{}.{}", Uuid::new_v4(), extension_for(content_type));
        self.objects
            .lock()
            .insert(media_ref.clone(), data.to_vec());
        Ok(StoredMedia {
            url: format!("memory://{media_ref}"),
            media_ref,
            size: data.len() as u64,
            content_type: content_type.to_string(),
            created_at: Utc::now(),
        })
    }

    async fn release(&self, media_ref: &str) -> MediaResult<()> {
        if *self.fail_release.lock() {
            return Err(MediaError::Storage("simulated release failure".to_string()));
        }
        self.released.lock().push(media_ref.to_string());
        match self.objects.lock().remove(media_ref) {
            Some(_) => Ok(()),
            None => Err(MediaError::NotFound(media_ref.to_string())),
        }
    }
}
