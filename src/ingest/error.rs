use thiserror::Error;

/// Reasons an upload is not well-formed delimited text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A quoted field was opened and never closed.
    #[error("quoted field starting on line {line} is never closed")]
    UnterminatedQuote {
        /// 1-based line on which the quoted field opened.
        line: u64,
    },

    /// A quoted field is followed by something other than a delimiter or a
    /// line break.
    #[error("unexpected text after a closing quote on line {line}")]
    StrayQuote {
        /// 1-based line of the closing quote.
        line: u64,
    },

    /// A row has a different number of fields than the header.
    #[error("row on line {line} has {found} fields, expected {expected}")]
    InconsistentColumns {
        /// 1-based line on which the row starts.
        line: u64,
        /// Number of columns in the header.
        expected: usize,
        /// Number of fields found in the row.
        found: usize,
    },

    /// A byte-order mark announced an encoding the content does not match.
    #[error("file is marked as {encoding} but contains invalid {encoding} data")]
    InvalidEncoding {
        /// Name of the BOM-selected encoding.
        encoding: &'static str,
    },

    /// Any other error reported by the CSV reader.
    #[error("{message}")]
    Malformed {
        /// Reader error message.
        message: String,
    },
}
