//! Local filesystem upload storage

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt};

use super::{StoredImage, UploadStorage, content_type_for, validate_name};
use crate::error::{StoreError, StoreResult};

/// Images as plain files in one directory
///
/// Structure: `{root}/{name}`. The content type is recovered from the
/// file extension on read.
pub struct LocalUploadStorage {
    root: PathBuf,
}

impl LocalUploadStorage {
    /// Create storage at the given directory
    ///
    /// Creates the directory if it doesn't exist.
    pub async fn new(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> StoreResult<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl UploadStorage for LocalUploadStorage {
    async fn put(&self, name: &str, _content_type: &str, data: &[u8]) -> StoreResult<()> {
        let path = self.path_for(name)?;
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(StoreError::Conflict(format!("image {name}")));
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(data).await?;
        file.flush().await?;
        Ok(())
    }

    async fn get(&self, name: &str) -> StoreResult<StoredImage> {
        let path = self.path_for(name)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(StoredImage {
                content_type: content_type_for(name).to_string(),
                bytes,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(format!("Image {name}")))
            }
            Err(e) => Err(e.into()),
        }
    }
}
