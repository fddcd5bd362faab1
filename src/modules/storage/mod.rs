//! Photo storage backends.
//!
//! Family photos go either to a directory on local disk or to a
//! MinIO/S3-compatible bucket, selected by configuration.

mod local_store;
mod minio_client;

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::config::StorageConfig;
use crate::core::error::AppError;

pub use local_store::LocalPhotoStore;
pub use minio_client::MinIOClient;

/// File store collaborator: persists bytes under a generated name.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Persist `data` under `name` and return the stored path/key
    async fn save(&self, data: Vec<u8>, name: &str, content_type: &str) -> Result<String, AppError>;

    /// Remove a previously stored object. Missing objects are not an error.
    async fn delete(&self, stored_path: &str) -> Result<(), AppError>;
}

/// Build the configured photo store
pub async fn build_photo_store(config: &StorageConfig) -> Result<Arc<dyn PhotoStore>, AppError> {
    match config {
        StorageConfig::Local { upload_dir } => {
            let store = LocalPhotoStore::new(upload_dir.clone()).await?;
            tracing::info!("Photo storage: local directory {}", upload_dir.display());
            Ok(Arc::new(store))
        }
        StorageConfig::MinIO(minio) => {
            let client = MinIOClient::new(minio.clone()).await?;
            tracing::info!("Photo storage: MinIO bucket {}", client.bucket_name());
            Ok(Arc::new(client))
        }
    }
}

/// Object names are generated server side; refuse anything that could escape the store root
pub(crate) fn ensure_safe_name(name: &str) -> Result<(), AppError> {
    let unsafe_name = name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.starts_with('.');
    if unsafe_name {
        return Err(AppError::BadRequest(format!("Invalid file name '{}'", name)));
    }
    Ok(())
}
