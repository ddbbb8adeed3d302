//! In-memory upload storage (for testing)

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{StoredImage, UploadStorage, validate_name};
use crate::error::{StoreError, StoreResult};

/// In-memory image storage for tests
///
/// Thread-safe via `RwLock`. Not persistent; data is lost on drop.
#[derive(Default)]
pub struct InMemoryUploadStorage {
    images: RwLock<HashMap<String, StoredImage>>,
}

impl InMemoryUploadStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored images
    pub fn len(&self) -> usize {
        self.images.read().map(|i| i.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UploadStorage for InMemoryUploadStorage {
    async fn put(&self, name: &str, content_type: &str, data: &[u8]) -> StoreResult<()> {
        validate_name(name)?;
        let mut images = self.images.write().map_err(|_| StoreError::poisoned())?;
        if images.contains_key(name) {
            return Err(StoreError::Conflict(format!("image {name}")));
        }
        images.insert(
            name.to_string(),
            StoredImage {
                content_type: content_type.to_string(),
                bytes: data.to_vec(),
            },
        );
        Ok(())
    }

    async fn get(&self, name: &str) -> StoreResult<StoredImage> {
        validate_name(name)?;
        self.images
            .read()
            .map_err(|_| StoreError::poisoned())?
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Image {name}")))
    }
}
