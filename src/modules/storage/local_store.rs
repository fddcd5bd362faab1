use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use super::{ensure_safe_name, PhotoStore};
use crate::core::error::AppError;

/// Stores photos as plain files under an upload directory
pub struct LocalPhotoStore {
    root: PathBuf,
}

impl LocalPhotoStore {
    /// Create the store, making sure the upload directory exists
    pub async fn new(root: PathBuf) -> Result<Self, AppError> {
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            AppError::Storage(format!(
                "Failed to create upload directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(Self { root })
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

#[async_trait]
impl PhotoStore for LocalPhotoStore {
    async fn save(&self, data: Vec<u8>, name: &str, _content_type: &str) -> Result<String, AppError> {
        ensure_safe_name(name)?;

        let path = self.root.join(name);
        tokio::fs::write(&path, &data).await.map_err(|e| {
            AppError::Storage(format!("Failed to write {}: {}", path.display(), e))
        })?;

        debug!("Stored {} bytes at {}", data.len(), path.display());
        Ok(name.to_string())
    }

    async fn delete(&self, stored_path: &str) -> Result<(), AppError> {
        ensure_safe_name(stored_path)?;

        match tokio::fs::remove_file(self.root.join(stored_path)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to delete {}: {}",
                stored_path, e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_then_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalPhotoStore::new(dir.path().join("uploads")).await.unwrap();

        let stored = store
            .save(b"jpeg-bytes".to_vec(), "family_1_1700000000.jpg", "image/jpeg")
            .await
            .unwrap();
        assert_eq!(stored, "family_1_1700000000.jpg");

        let on_disk = tokio::fs::read(store.root().join(&stored)).await.unwrap();
        assert_eq!(on_disk, b"jpeg-bytes");

        store.delete(&stored).await.unwrap();
        assert!(!store.root().join(&stored).exists());

        // Deleting twice is fine
        store.delete(&stored).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalPhotoStore::new(dir.path().to_path_buf()).await.unwrap();

        let err = store
            .save(b"x".to_vec(), "../outside.jpg", "image/jpeg")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
