use std::collections::HashMap;

use axum::extract::Multipart;
use tracing::debug;

use crate::core::error::AppError;
use crate::features::families::dtos::CreateFamilyDto;
use crate::features::families::models::PhotoUpload;

/// Read a multipart intake form: text fields plus an optional `photo` file part
pub async fn read_family_form(
    mut multipart: Multipart,
) -> Result<(CreateFamilyDto, Option<PhotoUpload>), AppError> {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut photo: Option<PhotoUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == "photo" {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());

            let data = field.bytes().await.map_err(|e| {
                debug!("Failed to read photo bytes: {}", e);
                AppError::BadRequest(format!("Failed to read photo data: {}", e))
            })?;

            // Browsers send an empty part when no file was picked
            if !data.is_empty() {
                photo = Some(PhotoUpload::new(data.to_vec(), &content_type)?);
            }
            continue;
        }

        let text = field.text().await.map_err(|e| {
            AppError::BadRequest(format!("Failed to read field '{}': {}", field_name, e))
        })?;
        fields.insert(field_name, text);
    }

    Ok((CreateFamilyDto::from_form(&fields)?, photo))
}

/// Decode the JSON intake's embedded photo, if any
pub fn offline_photo(dto: &mut CreateFamilyDto) -> Result<Option<PhotoUpload>, AppError> {
    match dto.photo.take() {
        Some(photo) if !photo.data.trim().is_empty() => {
            PhotoUpload::from_data_url(&photo.data).map(Some)
        }
        _ => Ok(None),
    }
}
