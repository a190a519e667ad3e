use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{AppError, ErrorPresentation};

/// API error with HTTP status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub code: String,
    /// Title and suggested action, when the error came from the pipeline.
    pub presentation: Option<ErrorPresentation>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            code: "BAD_REQUEST".to_string(),
            presentation: None,
        }
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: message.into(),
            code: "PAYLOAD_TOO_LARGE".to_string(),
            presentation: None,
        }
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.into(),
            code: "UNPROCESSABLE_ENTITY".to_string(),
            presentation: None,
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            code: "INTERNAL_SERVER_ERROR".to_string(),
            presentation: None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "code": self.code,
                "title": self.presentation.as_ref().map(|p| p.title.as_str()),
                "action": self.presentation.as_ref().and_then(|p| p.action.as_deref()),
            }
        }));

        (self.status, body).into_response()
    }
}

/// HTTP status an `AppError` is reported with.
pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::MissingUpload | AppError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
        AppError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        AppError::Parse(_) | AppError::EmptyInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::Serialization(_) | AppError::Io(_) | AppError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Convert AppError to ApiError
impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        let constructor = match status_for(&e) {
            StatusCode::BAD_REQUEST => ApiError::bad_request,
            StatusCode::PAYLOAD_TOO_LARGE => ApiError::payload_too_large,
            StatusCode::UNPROCESSABLE_ENTITY => ApiError::unprocessable,
            _ => ApiError::internal_error,
        };
        // Internal details go to the log, the client gets the presentation text.
        let presentation = e.to_presentation();
        ApiError {
            presentation: Some(presentation.clone()),
            ..constructor(presentation.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::ParseError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&AppError::MissingUpload), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&AppError::FileTooLarge { limit_bytes: 10 }),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            status_for(&AppError::Parse(ParseError::UnterminatedQuote { line: 1 })),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&AppError::EmptyInput("header only".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&AppError::Serialization("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_api_error_from_parse_error_keeps_detail() {
        let api: ApiError = AppError::Parse(ParseError::InconsistentColumns {
            line: 4,
            expected: 3,
            found: 2,
        })
        .into();

        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api.code, "UNPROCESSABLE_ENTITY");
        assert!(api.message.contains("line 4"));
    }

    #[test]
    fn test_api_error_carries_title_and_action() {
        let api: ApiError = AppError::EmptyInput("header only".into()).into();
        let presentation = api.presentation.expect("presentation should be set");

        assert_eq!(presentation.title, "Nothing to Split");
        assert!(presentation.action.is_some());
    }

    #[test]
    fn test_api_error_hides_internal_detail() {
        let api: ApiError = AppError::Internal("join handle panicked at src/x.rs".into()).into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.message.contains("src/x.rs"));
    }
}
