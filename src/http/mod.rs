//! Browser-facing delivery of split results.
//!
//! A single upload page posts a CSV file; the response lists one download
//! link per part. `/api/split` exposes the same pipeline as JSON.

pub mod app_server;
pub mod error;
pub mod handlers;
pub mod models;
pub mod page;
mod upload;
