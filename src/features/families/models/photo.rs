use base64::prelude::*;

use crate::core::error::AppError;
use crate::shared::constants::{ALLOWED_PHOTO_TYPES, MAX_PHOTO_SIZE};
use crate::shared::validation::DATA_URL_REGEX;

/// A photo received at intake, already checked for size and type
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub data: Vec<u8>,
    pub content_type: String,
}

impl PhotoUpload {
    /// Validate raw bytes from a multipart file part
    pub fn new(data: Vec<u8>, content_type: &str) -> Result<Self, AppError> {
        let content_type = content_type.trim().to_lowercase();

        if data.is_empty() {
            return Err(AppError::BadRequest("Photo is empty".to_string()));
        }

        if data.len() > MAX_PHOTO_SIZE {
            return Err(AppError::BadRequest(format!(
                "Photo too large. Maximum size is {} MB",
                MAX_PHOTO_SIZE / 1024 / 1024
            )));
        }

        if !ALLOWED_PHOTO_TYPES.contains(&content_type.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Photo type '{}' is not allowed. Allowed types: {}",
                content_type,
                ALLOWED_PHOTO_TYPES.join(", ")
            )));
        }

        Ok(Self { data, content_type })
    }

    /// Decode a `data:<mime>;base64,<payload>` string as kept by the offline client
    pub fn from_data_url(data_url: &str) -> Result<Self, AppError> {
        let caps = DATA_URL_REGEX
            .captures(data_url.trim())
            .ok_or_else(|| AppError::BadRequest("Photo must be a base64 data URL".to_string()))?;

        let payload: String = caps["payload"]
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let data = BASE64_STANDARD
            .decode(payload.as_bytes())
            .map_err(|e| AppError::BadRequest(format!("Photo is not valid base64: {}", e)))?;

        Self::new(data, &caps["mime"])
    }

    pub fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/png" => "png",
            "image/webp" => "webp",
            _ => "jpg",
        }
    }
}

/// Stored name of a family photo: unique per family and upload second
pub fn photo_filename(family_id: i64, uploaded_at: i64, extension: &str) -> String {
    format!("family_{}_{}.{}", family_id, uploaded_at, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_filename_is_deterministic() {
        assert_eq!(
            photo_filename(12, 1_700_000_000, "jpg"),
            "family_12_1700000000.jpg"
        );
        assert_ne!(
            photo_filename(12, 1_700_000_000, "jpg"),
            photo_filename(13, 1_700_000_000, "jpg")
        );
    }

    #[test]
    fn test_accepts_known_image_types() {
        let photo = PhotoUpload::new(vec![1, 2, 3], "Image/PNG").unwrap();
        assert_eq!(photo.content_type, "image/png");
        assert_eq!(photo.extension(), "png");
    }

    #[test]
    fn test_rejects_unknown_type_and_empty_payload() {
        assert!(PhotoUpload::new(vec![1], "application/pdf").is_err());
        assert!(PhotoUpload::new(Vec::new(), "image/jpeg").is_err());
    }

    #[test]
    fn test_rejects_oversized_photo() {
        let big = vec![0u8; MAX_PHOTO_SIZE + 1];
        assert!(PhotoUpload::new(big, "image/jpeg").is_err());
    }

    #[test]
    fn test_decodes_data_url() {
        let encoded = BASE64_STANDARD.encode(b"fake-jpeg");
        let photo = PhotoUpload::from_data_url(&format!("data:image/jpeg;base64,{}", encoded))
            .unwrap();
        assert_eq!(photo.data, b"fake-jpeg");
        assert_eq!(photo.extension(), "jpg");
    }

    #[test]
    fn test_rejects_malformed_data_url() {
        assert!(PhotoUpload::from_data_url("not a data url").is_err());
        assert!(PhotoUpload::from_data_url("data:image/jpeg;base64,@@@").is_err());
    }
}
