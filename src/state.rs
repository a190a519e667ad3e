//! Shared server state.
//!
//! Holds only what is fixed for the lifetime of the server. Uploads and the
//! parts produced from them live in the handling request and nowhere else.

use crate::commands::SplitOptions;
use crate::config::AppConfig;

/// State shared by all HTTP handlers.
///
/// Read-only after startup; wrapped in an `Arc` by the router.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Creates the state from a validated configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Split options for web uploads: the fixed default chunk size and the
    /// configured line ending policy.
    pub fn split_options(&self) -> SplitOptions {
        SplitOptions {
            line_endings: self.config.output.line_endings,
            ..SplitOptions::default()
        }
    }

    /// Largest accepted upload in bytes.
    pub fn max_upload_bytes(&self) -> u64 {
        self.config.limits.max_upload_bytes
    }
}
