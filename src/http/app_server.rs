use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::http::handlers::{health_handler, index_handler, split_api_handler, split_page_handler};
use crate::state::AppState;

pub struct AppServer {
    pub router: Router,
    pub state: Arc<AppState>,
}

pub const PATH_INDEX: &str = "/";
pub const PATH_SPLIT: &str = "/split";
pub const PATH_API_SPLIT: &str = "/api/split";
pub const PATH_HEALTH: &str = "/health";

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

impl AppServer {
    pub fn new(state: AppState) -> Self {
        let state = Arc::new(state);
        let body_limit = usize::try_from(state.max_upload_bytes())
            .unwrap_or(usize::MAX)
            .saturating_add(MULTIPART_OVERHEAD_BYTES);

        AppServer {
            router: Router::new()
                .route(PATH_INDEX, get(index_handler))
                .route(PATH_SPLIT, get(index_handler).post(split_page_handler))
                .route(PATH_API_SPLIT, post(split_api_handler))
                .route(PATH_HEALTH, get(health_handler))
                .layer(DefaultBodyLimit::max(body_limit))
                .with_state(state.clone()),
            state,
        }
    }
}
