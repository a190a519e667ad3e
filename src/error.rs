use thiserror::Error;

use crate::ingest::ParseError;

/// User-friendly error presentation for the upload page and JSON API.
#[derive(Debug, Clone)]
pub struct ErrorPresentation {
    pub title: String,
    pub message: String,
    pub action: Option<String>,
}

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    // ── Upload ────────────────────────────────────────────────────────────────
    #[error("No file was uploaded")]
    MissingUpload,

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("File exceeds the upload limit of {limit_bytes} bytes")]
    FileTooLarge { limit_bytes: u64 },

    // ── CSV ───────────────────────────────────────────────────────────────────
    #[error("Invalid CSV: {0}")]
    Parse(#[from] ParseError),

    #[error("CSV has no data rows: {0}")]
    EmptyInput(String),

    #[error("Failed to write CSV part: {0}")]
    Serialization(String),

    // ── Filesystem ────────────────────────────────────────────────────────────
    #[error("I/O error: {0}")]
    Io(String),

    // ── Generic fallback ──────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Converts the error into a presentation suitable for UI display.
    /// Filesystem paths and internal details stay in the logs.
    pub fn to_presentation(&self) -> ErrorPresentation {
        match self {
            // ── Upload ────────────────────────────────────────────────────────
            AppError::MissingUpload => ErrorPresentation {
                title: "No File Selected".into(),
                message: "Choose a CSV file before pressing Split.".into(),
                action: Some("Select a CSV file".into()),
            },

            AppError::InvalidUpload(_) => ErrorPresentation {
                title: "Upload Failed".into(),
                message: "The file could not be received. Please try uploading it again.".into(),
                action: Some("Upload the file again".into()),
            },

            AppError::FileTooLarge { limit_bytes } => ErrorPresentation {
                title: "File Too Large".into(),
                message: format!(
                    "The maximum upload size is {:.0} MB.",
                    *limit_bytes as f64 / (1024.0 * 1024.0)
                ),
                action: Some("Upload a smaller file".into()),
            },

            // ── CSV ───────────────────────────────────────────────────────────
            AppError::Parse(err) => ErrorPresentation {
                title: "Invalid CSV".into(),
                message: format!("The CSV file has a formatting problem: {}", err),
                action: Some("Fix the CSV file and try again".into()),
            },

            AppError::EmptyInput(msg) => ErrorPresentation {
                title: "Nothing to Split".into(),
                message: format!("The file must have a header and at least one data row ({}).", msg),
                action: Some("Upload a CSV file with data rows".into()),
            },

            AppError::Serialization(_) => ErrorPresentation {
                title: "CSV Processing Error".into(),
                message: "The split files could not be produced. No files were created.".into(),
                action: Some("Check your CSV file format".into()),
            },

            // ── Filesystem ────────────────────────────────────────────────────
            AppError::Io(_) => ErrorPresentation {
                title: "File Error".into(),
                message: "A file could not be read or written.".into(),
                action: Some("Check file permissions and try again".into()),
            },

            // ── Generic ───────────────────────────────────────────────────────
            AppError::Internal(_) => ErrorPresentation {
                title: "Unexpected Error".into(),
                message: "Something went wrong. Please try again.".into(),
                action: Some("Try again".into()),
            },
        }
    }
}
