//! Split pipeline: parse an upload, chunk it, render every part.
//!
//! One call handles one upload from start to finish. Nothing is kept
//! between calls, and a call either returns every part or none of them.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::chunking::{
    chunk_file_name, render, split, AtomicFileWriter, ChunkSize, LineEndingPolicy,
};
use crate::error::AppError;
use crate::ingest::{parse, LineEndings};

// ─────────────────────────────────────────────────────────────────────────────
// Request/Response Types
// ─────────────────────────────────────────────────────────────────────────────

/// Knobs for one split run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitOptions {
    /// Maximum data rows per part.
    pub chunk_size: ChunkSize,
    /// Line terminator policy for the rendered parts.
    pub line_endings: LineEndingPolicy,
}

/// One rendered part, ready for download.
#[derive(Debug, Clone)]
pub struct SplitPart {
    /// 1-based part number.
    pub index: usize,
    /// Download name, `<basename>_part<index>.csv`.
    pub file_name: String,
    /// Data rows in this part (header excluded).
    pub rows: usize,
    /// Rendered CSV bytes.
    pub content: Vec<u8>,
}

/// Everything produced from one upload.
#[derive(Debug, Clone)]
pub struct SplitOutcome {
    /// File name as uploaded.
    pub source_name: String,
    /// Data rows in the upload (header excluded).
    pub total_rows: usize,
    /// Rows per part used for this run.
    pub chunk_size: usize,
    /// Encoding the upload was decoded from.
    pub encoding: &'static str,
    /// Line ending style of the upload.
    pub line_endings: LineEndings,
    /// Parts in order.
    pub parts: Vec<SplitPart>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Pipeline
// ─────────────────────────────────────────────────────────────────────────────

/// Parses `bytes`, splits the rows and renders each part.
///
/// # Errors
///
/// - `AppError::Parse` / `AppError::EmptyInput` when the upload is not usable
/// - `AppError::Serialization` when any part fails to render; parts that were
///   already rendered are discarded
pub fn split_upload(
    file_name: &str,
    bytes: &[u8],
    options: &SplitOptions,
) -> Result<SplitOutcome, AppError> {
    let dataset = parse(bytes)?;

    if dataset.is_empty() {
        return Err(AppError::EmptyInput("only a header row was found".to_string()));
    }

    let terminator = options.line_endings.terminator_for(dataset.line_endings());

    let parts = split(&dataset, options.chunk_size)
        .iter()
        .map(|chunk| -> Result<SplitPart, AppError> {
            Ok(SplitPart {
                index: chunk.part_number(),
                file_name: chunk_file_name(file_name, chunk.part_number()),
                rows: chunk.row_count(),
                content: render(chunk, terminator)?,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    info!(
        file_name,
        rows = dataset.row_count(),
        parts = parts.len(),
        encoding = dataset.encoding(),
        "Split upload"
    );

    Ok(SplitOutcome {
        source_name: file_name.to_string(),
        total_rows: dataset.row_count(),
        chunk_size: options.chunk_size.get(),
        encoding: dataset.encoding(),
        line_endings: dataset.line_endings(),
        parts,
    })
}

/// Runs [`split_upload`] on the blocking thread pool.
pub async fn split_upload_async<B>(
    file_name: String,
    bytes: B,
    options: SplitOptions,
) -> Result<SplitOutcome, AppError>
where
    B: AsRef<[u8]> + Send + 'static,
{
    tokio::task::spawn_blocking(move || split_upload(&file_name, bytes.as_ref(), &options))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
}

/// Splits a CSV file on disk, writing each part into `out_dir`.
///
/// Every part is staged to a temporary file first; the parts only appear
/// under their final names once all of them were written.
///
/// # Errors
///
/// Returns `AppError::Io` if the source cannot be read or a part cannot be
/// written, plus every error of [`split_upload`].
pub async fn split_file_to_dir(
    source: &Path,
    out_dir: &Path,
    options: SplitOptions,
) -> Result<(SplitOutcome, Vec<PathBuf>), AppError> {
    let bytes = tokio::fs::read(source).await.map_err(|e| {
        AppError::Io(format!("Failed to read {}: {}", source.display(), e))
    })?;

    tokio::fs::create_dir_all(out_dir)
        .await
        .map_err(|e| AppError::Io(format!("Failed to create output directory: {}", e)))?;

    let file_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let out_dir = out_dir.to_owned();

    tokio::task::spawn_blocking(move || {
        let outcome = split_upload(&file_name, &bytes, &options)?;
        let paths = write_parts(&outcome, &out_dir)?;
        Ok((outcome, paths))
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
}

/// Writes all parts of `outcome` into `out_dir`, all or nothing.
///
/// If persisting any part fails, the parts already persisted are removed
/// and the staged ones are dropped with their temporary files.
fn write_parts(outcome: &SplitOutcome, out_dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let mut staged = Vec::with_capacity(outcome.parts.len());
    for part in &outcome.parts {
        let mut writer = AtomicFileWriter::new(out_dir.join(&part.file_name))?;
        writer.write_bytes(&part.content)?;
        staged.push(writer);
    }

    let mut written = Vec::with_capacity(staged.len());
    for writer in staged {
        match writer.finish() {
            Ok(path) => written.push(path),
            Err(err) => {
                remove_written(&written);
                return Err(err);
            }
        }
    }

    Ok(written)
}

fn remove_written(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = std::fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "Failed to remove part after aborted split");
        }
    }
}
