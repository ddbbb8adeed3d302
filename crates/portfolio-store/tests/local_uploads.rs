//! Integration tests for LocalUploadStorage

use portfolio_store::uploads::upload_name;
use portfolio_store::{LocalUploadStorage, StoreError, UploadStorage};
use tempfile::TempDir;

#[tokio::test]
async fn test_local_roundtrip() {
    let temp = TempDir::new().unwrap();
    let storage = LocalUploadStorage::new(temp.path()).await.unwrap();

    let name = upload_name("avatar.png", 1_700_000_000_000);
    storage.put(&name, "image/png", b"\x89PNG\r\n").await.unwrap();

    let image = storage.get(&name).await.unwrap();
    assert_eq!(image.bytes, b"\x89PNG\r\n");
    assert_eq!(image.content_type, "image/png");
    assert!(temp.path().join(&name).exists());
}

#[tokio::test]
async fn test_local_persistence() {
    let temp = TempDir::new().unwrap();
    let name = upload_name("cover.jpg", 42);

    // Write with one instance
    {
        let storage = LocalUploadStorage::new(temp.path()).await.unwrap();
        storage.put(&name, "image/jpeg", b"jpeg bytes").await.unwrap();
    }

    // Read with new instance
    {
        let storage = LocalUploadStorage::new(temp.path()).await.unwrap();
        let image = storage.get(&name).await.unwrap();
        assert_eq!(image.bytes, b"jpeg bytes");
        assert_eq!(image.content_type, "image/jpeg");
    }
}

#[tokio::test]
async fn test_local_never_overwrites() {
    let temp = TempDir::new().unwrap();
    let storage = LocalUploadStorage::new(temp.path()).await.unwrap();
    let name = upload_name("avatar.png", 7);

    storage.put(&name, "image/png", b"first").await.unwrap();
    let result = storage.put(&name, "image/png", b"second").await;

    assert!(matches!(result, Err(StoreError::Conflict(_))));
    assert_eq!(storage.get(&name).await.unwrap().bytes, b"first");
}

#[tokio::test]
async fn test_local_creates_root() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("nested").join("uploads");
    let storage = LocalUploadStorage::new(&root).await.unwrap();
    assert!(storage.root().is_dir());
}

#[tokio::test]
async fn test_local_not_found() {
    let temp = TempDir::new().unwrap();
    let storage = LocalUploadStorage::new(temp.path()).await.unwrap();

    let result = storage.get("1-missing.png").await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_local_rejects_traversal() {
    let temp = TempDir::new().unwrap();
    let storage = LocalUploadStorage::new(temp.path().join("uploads")).await.unwrap();

    let result = storage.put("../outside.png", "image/png", b"x").await;
    assert!(matches!(result, Err(StoreError::InvalidName(_))));
    assert!(!temp.path().join("outside.png").exists());
}
