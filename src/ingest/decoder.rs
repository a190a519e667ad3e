//! Text decoding and lightweight structural checks on uploaded bytes.
//!
//! Uploads come from arbitrary spreadsheets and exports, so the encoding is
//! detected rather than assumed:
//! - A byte-order mark selects UTF-8, UTF-16LE or UTF-16BE and is stripped
//! - Otherwise strict UTF-8 is tried first
//! - Anything that is not valid UTF-8 is read as Windows-1252

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use serde::{Deserialize, Serialize};

use super::error::ParseError;

// ─────────────────────────────────────────────────────────────────────────────
// Public Types
// ─────────────────────────────────────────────────────────────────────────────

/// Upload bytes decoded to text, with what was learned along the way.
#[derive(Debug, Clone)]
pub struct DecodedUpload<'a> {
    /// Decoded text without any byte-order mark.
    pub text: Cow<'a, str>,
    /// Name of the encoding the text was decoded from.
    pub encoding: &'static str,
    /// Whether the upload started with a byte-order mark.
    pub had_bom: bool,
    /// Line ending style found in the decoded text.
    pub line_endings: LineEndings,
}

/// Detected line ending style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineEndings {
    /// Unix-style line endings (\n).
    LF,
    /// Windows-style line endings (\r\n).
    CRLF,
    /// Mixed line endings (both \n and \r\n found).
    Mixed,
    /// No line endings detected (single line or empty).
    Unknown,
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Decodes uploaded bytes to text.
///
/// Valid UTF-8 input is borrowed, not copied.
///
/// # Errors
///
/// Returns `ParseError::InvalidEncoding` when a UTF-16 byte-order mark is
/// followed by malformed UTF-16. Unmarked input always decodes.
pub fn decode_upload(bytes: &[u8]) -> Result<DecodedUpload<'_>, ParseError> {
    let (text, encoding, had_bom) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => {
            let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
            if had_errors {
                return Err(ParseError::InvalidEncoding {
                    encoding: encoding.name(),
                });
            }
            (text, encoding, true)
        }
        None => match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
            Some(text) => (text, UTF_8, false),
            None => {
                let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
                (text, WINDOWS_1252, false)
            }
        },
    };

    let line_endings = detect_line_endings(text.as_bytes());

    Ok(DecodedUpload {
        text,
        encoding: encoding.name(),
        had_bom,
        line_endings,
    })
}

/// Detects line ending style in the given bytes.
pub fn detect_line_endings(data: &[u8]) -> LineEndings {
    let mut has_lf = false;
    let mut has_crlf = false;

    let mut i = 0;
    while i < data.len() {
        if data[i] == b'\r' && i + 1 < data.len() && data[i + 1] == b'\n' {
            has_crlf = true;
            i += 2;
        } else if data[i] == b'\n' {
            has_lf = true;
            i += 1;
        } else {
            i += 1;
        }
    }

    match (has_lf, has_crlf) {
        (true, true) => LineEndings::Mixed,
        (true, false) => LineEndings::LF,
        (false, true) => LineEndings::CRLF,
        (false, false) => LineEndings::Unknown,
    }
}

/// Checks that every quoted field is closed and followed by a field or
/// record boundary.
///
/// A quote only opens a quoted field at the start of a field; elsewhere it is
/// a literal character. Inside a quoted field `""` is an escaped quote. After
/// the closing quote only `,`, `\r`, `\n` or the end of input may follow.
///
/// # Errors
///
/// - `ParseError::UnterminatedQuote` with the line on which the field opened
/// - `ParseError::StrayQuote` with the line of the offending closing quote
pub fn check_quoting(data: &[u8]) -> Result<(), ParseError> {
    let mut line: u64 = 1;
    let mut opened_on: u64 = 0;
    let mut in_quotes = false;
    let mut just_closed = false;
    let mut at_field_start = true;

    let mut i = 0;
    while i < data.len() {
        let byte = data[i];
        i += 1;

        if in_quotes {
            match byte {
                b'"' if data.get(i) == Some(&b'"') => i += 1,
                b'"' => {
                    in_quotes = false;
                    just_closed = true;
                }
                b'\n' => line += 1,
                _ => {}
            }
            continue;
        }

        if just_closed {
            just_closed = false;
            if !matches!(byte, b',' | b'\r' | b'\n') {
                return Err(ParseError::StrayQuote { line });
            }
        }

        match byte {
            b'"' if at_field_start => {
                in_quotes = true;
                opened_on = line;
                at_field_start = false;
            }
            b',' | b'\r' => at_field_start = true,
            b'\n' => {
                line += 1;
                at_field_start = true;
            }
            _ => at_field_start = false,
        }
    }

    if in_quotes {
        return Err(ParseError::UnterminatedQuote { line: opened_on });
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
