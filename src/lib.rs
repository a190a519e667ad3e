pub mod chunking;
pub mod commands;
pub mod config;
pub mod dataset;
pub mod error;
pub mod http;
pub mod ingest;
pub mod state;
pub mod telemetry;

pub use commands::{split_upload, SplitOptions, SplitOutcome, SplitPart};
pub use dataset::Dataset;
pub use error::AppError;
