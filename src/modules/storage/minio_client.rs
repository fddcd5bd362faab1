//! MinIO/S3-compatible photo storage.
//!
//! Uses rust-s3 with path-style addressing so it works against MinIO.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};

use super::{ensure_safe_name, PhotoStore};
use crate::core::config::MinIOConfig;
use crate::core::error::AppError;

/// MinIO/S3-compatible storage client
pub struct MinIOClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    public_endpoint: String,
    prefix: String,
}

impl MinIOClient {
    /// Create a client and make sure its bucket exists
    pub async fn new(config: MinIOConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Storage(format!("Failed to create MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Storage(format!("Failed to create MinIO bucket: {}", e)))?;

        // http://endpoint/bucket instead of http://bucket.endpoint
        bucket.set_path_style();

        let client = Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint,
            public_endpoint: config.public_endpoint,
            prefix: config.prefix.trim_matches('/').to_string(),
        };

        client.ensure_bucket_exists().await;

        info!(
            "MinIO client initialized for endpoint: {}, bucket: {}, prefix: {}",
            client.endpoint,
            client.bucket.name(),
            client.prefix
        );

        Ok(client)
    }

    /// Create the bucket if needed. An existing bucket is fine; other
    /// failures are logged and the bucket is assumed to exist.
    async fn ensure_bucket_exists(&self) {
        let result = Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match result {
            Ok(_) => info!("Bucket '{}' created successfully", self.bucket.name()),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                    || error_str.contains("already own it")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                }
            }
        }
    }

    /// Object key for a photo name, under the configured prefix
    pub fn generate_key(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.prefix, name)
        }
    }

    /// Direct URL for an object through the public endpoint
    pub fn get_public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_endpoint, self.bucket.name(), key)
    }

    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }
}

#[async_trait]
impl PhotoStore for MinIOClient {
    async fn save(&self, data: Vec<u8>, name: &str, content_type: &str) -> Result<String, AppError> {
        ensure_safe_name(name)?;
        let key = self.generate_key(name);

        self.bucket
            .put_object_with_content_type(&key, &data, content_type)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to upload '{}': {}", key, e)))?;

        debug!(
            "Uploaded '{}' to bucket '{}' ({})",
            key,
            self.bucket.name(),
            self.get_public_url(&key)
        );
        Ok(key)
    }

    async fn delete(&self, stored_path: &str) -> Result<(), AppError> {
        self.bucket
            .delete_object(stored_path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to delete '{}': {}", stored_path, e)))?;

        debug!(
            "Deleted '{}' from bucket '{}'",
            stored_path,
            self.bucket.name()
        );
        Ok(())
    }
}
