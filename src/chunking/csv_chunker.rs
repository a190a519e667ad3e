//! Record-aware CSV chunking that never corrupts records.
//!
//! Splits a parsed [`Dataset`] into contiguous runs of at most `ChunkSize`
//! rows and renders each run back to CSV with the original header row, so
//! every part is a self-contained file.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use clap::ValueEnum;
use csv::{QuoteStyle, StringRecord, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::AppError;
use crate::ingest::LineEndings;

/// Maximum number of data rows per part (excluding the header).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkSize(NonZeroUsize);

impl ChunkSize {
    /// 49,999 records per part.
    pub const DEFAULT: ChunkSize = match NonZeroUsize::new(49_999) {
        Some(n) => ChunkSize(n),
        None => panic!("default chunk size must be non-zero"),
    };

    /// Returns `None` for zero.
    pub fn new(rows: usize) -> Option<Self> {
        NonZeroUsize::new(rows).map(ChunkSize)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for ChunkSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ChunkSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChunkSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: usize = s
            .trim()
            .replace('_', "")
            .parse()
            .map_err(|e| format!("invalid chunk size '{}': {}", s, e))?;
        ChunkSize::new(rows).ok_or_else(|| "chunk size must be at least 1".to_string())
    }
}

/// How output parts terminate their lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LineEndingPolicy {
    /// Keep the upload's convention when it is uniform, CRLF otherwise.
    #[default]
    Auto,
    /// Always `\r\n`.
    Crlf,
    /// Always `\n`.
    Lf,
}

impl LineEndingPolicy {
    /// Picks the record terminator for output written from an upload with
    /// the given line endings.
    pub fn terminator_for(self, source: LineEndings) -> Terminator {
        match (self, source) {
            (LineEndingPolicy::Lf, _) | (LineEndingPolicy::Auto, LineEndings::LF) => {
                Terminator::Any(b'\n')
            }
            _ => Terminator::CRLF,
        }
    }
}

/// A contiguous run of dataset rows, carrying the header it belongs under.
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    index: usize,
    start: usize,
    headers: &'a StringRecord,
    rows: &'a [StringRecord],
}

impl<'a> Chunk<'a> {
    /// 1-based part number used in file names.
    pub fn part_number(&self) -> usize {
        self.index + 1
    }

    /// Offset of the first row within the dataset.
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn headers(&self) -> &'a StringRecord {
        self.headers
    }

    pub fn rows(&self) -> &'a [StringRecord] {
        self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Splits a dataset into chunks of at most `chunk_size` rows.
///
/// Chunk `i` holds rows `[i * size, min((i + 1) * size, row_count))`. A
/// dataset without data rows yields no chunks.
pub fn split(dataset: &Dataset, chunk_size: ChunkSize) -> Vec<Chunk<'_>> {
    let size = chunk_size.get();

    let chunks: Vec<Chunk<'_>> = dataset
        .rows()
        .chunks(size)
        .enumerate()
        .map(|(index, rows)| Chunk {
            index,
            start: index * size,
            headers: dataset.headers(),
            rows,
        })
        .collect();

    tracing::debug!(
        rows = dataset.row_count(),
        chunk_size = size,
        chunks = chunks.len(),
        "Split dataset into chunks"
    );

    chunks
}

/// Renders a chunk as UTF-8 CSV: the header row, then its rows.
///
/// Fields are quoted only when they contain a delimiter, quote or line break,
/// so parsing the output yields exactly the chunk's header and rows.
///
/// # Errors
///
/// Returns `AppError::Serialization` if a record cannot be written.
pub fn render(chunk: &Chunk<'_>, terminator: Terminator) -> Result<Vec<u8>, AppError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .terminator(terminator)
        .from_writer(Vec::with_capacity(
            (chunk.rows.len() + 1) * chunk.headers.len() * 16,
        ));

    writer.write_record(chunk.headers).map_err(|e| {
        AppError::Serialization(format!(
            "Failed to write header of part {}: {}",
            chunk.part_number(),
            e
        ))
    })?;

    for (offset, record) in chunk.rows.iter().enumerate() {
        writer.write_record(record).map_err(|e| {
            AppError::Serialization(format!(
                "Failed to write row {} of part {}: {}",
                chunk.start + offset + 1,
                chunk.part_number(),
                e
            ))
        })?;
    }

    writer.into_inner().map_err(|e| {
        AppError::Serialization(format!(
            "Failed to flush part {}: {}",
            chunk.part_number(),
            e.error()
        ))
    })
}

/// Builds the download name of a part: `<basename>_part<n>.csv`.
///
/// Any directory prefix (browsers on Windows may send `C:\fakepath\...`) and
/// the final extension are dropped. Characters that are unsafe in a download
/// file name become `_`. An empty base name becomes `split`.
pub fn chunk_file_name(original: &str, part_number: usize) -> String {
    format!("{}_part{}.csv", file_stem(original), part_number)
}

/// Extracts a safe base name from an uploaded file name.
fn file_stem(original: &str) -> String {
    let name = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original)
        .trim();

    let stem = match name.rfind('.') {
        Some(dot) => &name[..dot],
        None => name,
    };

    let cleaned: String = stem
        .chars()
        .map(|c| match c {
            '"' | '\'' | ';' | ':' | '*' | '?' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.trim_matches(['_', '.', ' ']).is_empty() {
        "split".to_string()
    } else {
        cleaned
    }
}
