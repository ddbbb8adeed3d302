//! Uploaded image storage
//!
//! Images are stored under `<unix millis>-<original name>`, with the
//! original name reduced to a safe character set. Names are flat: no
//! directories, no dot-dot.

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};

mod local;
mod memory;

pub use local::LocalUploadStorage;
pub use memory::InMemoryUploadStorage;

/// Longest original-name stem kept in a stored name
const MAX_NAME_CHARS: usize = 100;

/// An image as read back from storage
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Flat, name-keyed image storage
#[async_trait]
pub trait UploadStorage: Send + Sync {
    /// Store an image under a name not used before
    ///
    /// Returns `StoreError::InvalidName` if the name is not a plain file name
    /// and `StoreError::Conflict` if an image with that name already exists.
    async fn put(&self, name: &str, content_type: &str, data: &[u8]) -> StoreResult<()>;

    /// Retrieve an image by name
    ///
    /// Returns `StoreError::NotFound` if there is no such image.
    async fn get(&self, name: &str) -> StoreResult<StoredImage>;
}

/// Storage name for an upload received at `millis`
pub fn upload_name(original: &str, millis: i64) -> String {
    let mut cleaned = String::with_capacity(original.len());
    for c in original.chars() {
        let c = if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
            c
        } else {
            '_'
        };
        // Collapse dot runs so no name ever contains ".."
        if c == '.' && cleaned.ends_with('.') {
            continue;
        }
        cleaned.push(c);
    }
    let cleaned = cleaned.trim_start_matches('.');
    let cleaned: String = cleaned.chars().take(MAX_NAME_CHARS).collect();

    if cleaned.is_empty() {
        format!("{millis}-image")
    } else {
        format!("{millis}-{cleaned}")
    }
}

/// Content type for a stored name, from its extension
pub fn content_type_for(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

pub(crate) fn validate_name(name: &str) -> StoreResult<()> {
    let plain = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', '\0'])
        && !name.contains("..");
    if !plain {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}
