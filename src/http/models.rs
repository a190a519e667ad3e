use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

use crate::commands::{SplitOutcome, SplitPart};
use crate::ingest::LineEndings;

/// Response body for POST /api/split
#[derive(Debug, Serialize)]
pub struct SplitResponse {
    pub source_file: String,
    pub total_rows: usize,
    pub chunk_size: usize,
    pub encoding: String,
    pub line_endings: LineEndings,
    pub parts: Vec<PartResponse>,
}

/// One part in a split response
#[derive(Debug, Serialize)]
pub struct PartResponse {
    pub index: usize,
    pub file_name: String,
    pub rows: usize,
    pub size_bytes: usize,
    pub content_base64: String,
}

impl From<&SplitPart> for PartResponse {
    fn from(part: &SplitPart) -> Self {
        Self {
            index: part.index,
            file_name: part.file_name.clone(),
            rows: part.rows,
            size_bytes: part.content.len(),
            content_base64: STANDARD.encode(&part.content),
        }
    }
}

impl From<&SplitOutcome> for SplitResponse {
    fn from(outcome: &SplitOutcome) -> Self {
        Self {
            source_file: outcome.source_name.clone(),
            total_rows: outcome.total_rows,
            chunk_size: outcome.chunk_size,
            encoding: outcome.encoding.to_string(),
            line_endings: outcome.line_endings,
            parts: outcome.parts.iter().map(PartResponse::from).collect(),
        }
    }
}
