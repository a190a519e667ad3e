use axum::body::Bytes;
use axum::extract::Multipart;
use axum::http::StatusCode;

use crate::error::AppError;

/// Name of the multipart field carrying the CSV file.
pub const FILE_FIELD: &str = "file";

/// A CSV file received from the upload form.
#[derive(Debug)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Pulls the `file` field out of a multipart form.
///
/// Other fields are ignored. A file input submitted with nothing selected
/// arrives as an empty, unnamed part and is reported as `MissingUpload`.
pub async fn read_upload(mut multipart: Multipart, limit_bytes: u64) -> Result<Upload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit_bytes))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().trim().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, limit_bytes))?;

        if file_name.is_empty() && bytes.is_empty() {
            return Err(AppError::MissingUpload);
        }

        if bytes.len() as u64 > limit_bytes {
            return Err(AppError::FileTooLarge { limit_bytes });
        }

        return Ok(Upload { file_name, bytes });
    }

    Err(AppError::MissingUpload)
}

fn multipart_error(err: axum::extract::multipart::MultipartError, limit_bytes: u64) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::FileTooLarge { limit_bytes }
    } else {
        AppError::InvalidUpload(err.body_text())
    }
}
