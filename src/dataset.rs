//! In-memory representation of one parsed upload.

use csv::StringRecord;

use crate::ingest::{LineEndings, ParseError};

/// A parsed CSV file: the header plus every data row, in input order.
///
/// Cell values are kept as the exact text the parser produced, so writing a
/// row back out never changes its contents. Every row has exactly one value
/// per header column.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    headers: StringRecord,
    rows: Vec<StringRecord>,
    encoding: &'static str,
    line_endings: LineEndings,
}

impl Dataset {
    /// Builds a dataset from already-separated records.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InconsistentColumns` for the first row whose width
    /// differs from the header. The reported line assumes one line per record.
    pub fn from_records(
        headers: StringRecord,
        rows: Vec<StringRecord>,
    ) -> Result<Self, ParseError> {
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(ParseError::InconsistentColumns {
                line: idx as u64 + 2,
                expected: headers.len(),
                found: row.len(),
            });
        }

        Ok(Self {
            headers,
            rows,
            encoding: "UTF-8",
            line_endings: LineEndings::Unknown,
        })
    }

    /// Records how the source text was encoded and terminated.
    pub(crate) fn with_source(mut self, encoding: &'static str, line_endings: LineEndings) -> Self {
        self.encoding = encoding;
        self.line_endings = line_endings;
        self
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    /// Number of data rows (the header is not counted).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Name of the encoding the upload was decoded from.
    pub fn encoding(&self) -> &'static str {
        self.encoding
    }

    /// Line ending style of the upload.
    pub fn line_endings(&self) -> LineEndings {
        self.line_endings
    }
}
