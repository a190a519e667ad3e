//! Strict CSV parsing of a decoded upload.

use csv::{ErrorKind, ReaderBuilder, StringRecord};

use super::decoder::{check_quoting, decode_upload};
use super::error::ParseError;
use crate::dataset::Dataset;
use crate::error::AppError;

/// Parses uploaded bytes into a [`Dataset`].
///
/// The first non-empty line is the header. Empty lines are skipped, every
/// other row must have as many fields as the header.
///
/// # Errors
///
/// - `AppError::Parse` for undecodable text, malformed quoting or ragged rows
/// - `AppError::EmptyInput` if there is no header row at all
///
/// A header with no data rows parses successfully into an empty dataset.
pub fn parse(bytes: &[u8]) -> Result<Dataset, AppError> {
    let decoded = decode_upload(bytes)?;

    check_quoting(decoded.text.as_bytes())?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(decoded.text.as_bytes());

    let headers = reader.headers().map_err(map_csv_error)?.clone();
    if headers.is_empty() {
        return Err(AppError::EmptyInput("file has no header row".to_string()));
    }

    let rows = reader
        .records()
        .collect::<Result<Vec<StringRecord>, _>>()
        .map_err(map_csv_error)?;

    tracing::debug!(
        encoding = decoded.encoding,
        had_bom = decoded.had_bom,
        columns = headers.len(),
        rows = rows.len(),
        "Parsed CSV upload"
    );

    let dataset = Dataset::from_records(headers, rows)?;
    Ok(dataset.with_source(decoded.encoding, decoded.line_endings))
}

/// Maps a reader error to the matching `ParseError`.
fn map_csv_error(err: csv::Error) -> ParseError {
    match err.kind() {
        ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => ParseError::InconsistentColumns {
            line: pos.as_ref().map(|p| p.line()).unwrap_or(0),
            expected: *expected_len as usize,
            found: *len as usize,
        },
        _ => ParseError::Malformed {
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::LineEndings;

    fn row(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_parse_simple_csv() {
        let dataset = parse(b"Id,Name\n1,Alice\n2,Bob\n").expect("parse failed");

        assert_eq!(dataset.headers(), &row(&["Id", "Name"]));
        assert_eq!(dataset.rows(), &[row(&["1", "Alice"]), row(&["2", "Bob"])]);
        assert_eq!(dataset.encoding(), "UTF-8");
        assert_eq!(dataset.line_endings(), LineEndings::LF);
    }

    #[test]
    fn test_quoted_fields_keep_commas_newlines_and_quotes() {
        let content = "Name,Bio\n\"John \"\"The Dev\"\"\",\"Works at Acme, Inc.\nLoves coding\"\n";
        let dataset = parse(content.as_bytes()).expect("parse failed");

        assert_eq!(dataset.row_count(), 1);
        assert_eq!(&dataset.rows()[0][0], "John \"The Dev\"");
        assert_eq!(&dataset.rows()[0][1], "Works at Acme, Inc.\nLoves coding");
    }

    #[test]
    fn test_values_are_not_coerced() {
        let dataset = parse(b"Zip,Amount,Flag\n00501,1.50,TRUE\n").expect("parse failed");
        assert_eq!(dataset.rows()[0], row(&["00501", "1.50", "TRUE"]));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let dataset = parse(b"Id,Name\n\n1,Alice\n\n\n2,Bob\n").expect("parse failed");
        assert_eq!(dataset.row_count(), 2);
    }

    #[test]
    fn test_header_only_parses_to_empty_dataset() {
        let dataset = parse(b"Id,Name\n").expect("parse failed");
        assert!(dataset.is_empty());
        assert_eq!(dataset.headers().len(), 2);
    }

    #[test]
    fn test_empty_file_is_empty_input() {
        match parse(b"") {
            Err(AppError::EmptyInput(msg)) => assert!(msg.contains("header")),
            other => panic!("Expected EmptyInput, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_quote_is_parse_error() {
        match parse(b"Id,Name\n1,\"Alice\n2,Bob\n") {
            Err(AppError::Parse(ParseError::UnterminatedQuote { line })) => assert_eq!(line, 2),
            other => panic!("Expected UnterminatedQuote, got {:?}", other),
        }
    }

    #[test]
    fn test_text_after_closing_quote_is_parse_error() {
        match parse(b"\"a\"b,c\n1,2\n") {
            Err(AppError::Parse(ParseError::StrayQuote { line })) => assert_eq!(line, 1),
            other => panic!("Expected StrayQuote, got {:?}", other),
        }
    }

    #[test]
    fn test_ragged_row_is_rejected() {
        match parse(b"Name,Value\nAlice,100\nBob,200,Extra\nCharlie,300\n") {
            Err(AppError::Parse(ParseError::InconsistentColumns {
                line,
                expected,
                found,
            })) => {
                assert_eq!(line, 3);
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("Expected InconsistentColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_latin1_upload_is_decoded() {
        let dataset = parse(b"Name,City\nJos\xe9,M\xe1laga\n").expect("parse failed");
        assert_eq!(dataset.encoding(), "windows-1252");
        assert_eq!(dataset.rows()[0], row(&["José", "Málaga"]));
    }

    #[test]
    fn test_crlf_upload_records_line_endings() {
        let dataset = parse(b"A,B\r\n1,2\r\n").expect("parse failed");
        assert_eq!(dataset.line_endings(), LineEndings::CRLF);
        assert_eq!(dataset.rows()[0], row(&["1", "2"]));
    }
}
