use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use tracing::{info, warn};

use crate::commands::{split_upload_async, SplitOutcome};
use crate::error::AppError;
use crate::http::error::{status_for, ApiError};
use crate::http::models::SplitResponse;
use crate::http::page::{results_page, upload_page};
use crate::http::upload::read_upload;
use crate::state::AppState;

/// Handler for GET /
pub async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(upload_page(
        None,
        state.split_options().chunk_size.get(),
        state.max_upload_bytes(),
    ))
}

/// Handler for POST /split - form upload, answers with an HTML page
#[tracing::instrument(
    name = "handler_split_page",
    skip(state, multipart),
    fields(
        request_id = %uuid::Uuid::new_v4(),
        csv_splitter.file_name = tracing::field::Empty,
        csv_splitter.rows = tracing::field::Empty,
        csv_splitter.parts = tracing::field::Empty,
    )
)]
pub async fn split_page_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let result = match multipart {
        Ok(multipart) => run_split(&state, multipart).await,
        Err(rejection) => Err(AppError::InvalidUpload(rejection.body_text())),
    };

    match result {
        Ok(outcome) => Html(results_page(&outcome, state.max_upload_bytes())).into_response(),
        Err(err) => {
            let status = status_for(&err);
            let presentation = err.to_presentation();
            (
                status,
                Html(upload_page(
                    Some(&presentation),
                    state.split_options().chunk_size.get(),
                    state.max_upload_bytes(),
                )),
            )
                .into_response()
        }
    }
}

/// Handler for POST /api/split - same pipeline, JSON response
#[tracing::instrument(
    name = "handler_split_api",
    skip(state, multipart),
    fields(
        request_id = %uuid::Uuid::new_v4(),
        csv_splitter.file_name = tracing::field::Empty,
        csv_splitter.rows = tracing::field::Empty,
        csv_splitter.parts = tracing::field::Empty,
    )
)]
pub async fn split_api_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SplitResponse>, ApiError> {
    let multipart = multipart.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let outcome = run_split(&state, multipart).await?;
    Ok(Json(SplitResponse::from(&outcome)))
}

/// Handler for GET /health
pub async fn health_handler() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "service": "csv-splitter"
        })),
    )
}

/// Reads the upload and runs the split pipeline for one request.
async fn run_split(state: &AppState, multipart: Multipart) -> Result<SplitOutcome, AppError> {
    let upload = read_upload(multipart, state.max_upload_bytes()).await?;

    tracing::Span::current().record("csv_splitter.file_name", upload.file_name.as_str());

    let size_bytes = upload.bytes.len();
    let result = split_upload_async(upload.file_name, upload.bytes, state.split_options()).await;

    match &result {
        Ok(outcome) => {
            tracing::Span::current()
                .record("csv_splitter.rows", outcome.total_rows)
                .record("csv_splitter.parts", outcome.parts.len());
            info!(size_bytes, "Upload split");
        }
        Err(err) => warn!(size_bytes, error = %err, "Upload rejected"),
    }

    result
}
