use axum::extract::Multipart;
use tracing::debug;

use crate::core::error::AppError;
use crate::modules::tabular::{self, Row, TabularFormat};
use crate::shared::constants::MAX_IMPORT_FILE_SIZE;

/// Read the `file` part of an upload and parse it into rows
pub async fn read_import_file(mut multipart: Multipart) -> Result<Vec<Row>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().map(|s| s.to_string());
        let data = field.bytes().await.map_err(|e| {
            debug!("Failed to read import bytes: {}", e);
            AppError::BadRequest(format!("Failed to read file data: {}", e))
        })?;

        if data.is_empty() {
            return Err(AppError::Validation("Import file is empty".to_string()));
        }
        if data.len() > MAX_IMPORT_FILE_SIZE {
            return Err(AppError::Validation(format!(
                "Import file exceeds maximum size of {} bytes",
                MAX_IMPORT_FILE_SIZE
            )));
        }

        let format = TabularFormat::detect(filename.as_deref(), &data)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        debug!(
            "Parsing {:?} import '{}' ({} bytes)",
            format,
            filename.as_deref().unwrap_or("<unnamed>"),
            data.len()
        );

        // Spreadsheet decoding is CPU-bound
        return tokio::task::spawn_blocking(move || tabular::parse(&data, format))
            .await
            .map_err(|e| AppError::Internal(format!("Import task failed: {}", e)))?
            .map_err(|e| AppError::BadRequest(e.to_string()));
    }

    Err(AppError::BadRequest("No file provided".to_string()))
}
