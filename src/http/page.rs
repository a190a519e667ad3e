//! HTML for the upload page and the results page.
//!
//! Download links are `data:` URIs carrying the part itself, so serving a
//! result needs no server-side storage once the response is sent.

use std::fmt::Write;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::commands::SplitOutcome;
use crate::error::ErrorPresentation;
use crate::http::upload::FILE_FIELD;

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;max-width:720px;margin:2rem auto;padding:0 1rem;color:#222}\
h1{margin-bottom:.25rem}\
form{margin:1.5rem 0;padding:1rem;border:1px solid #ddd;border-radius:6px}\
button{margin-left:.5rem;padding:.4rem 1rem}\
.error{background:#fdecea;border:1px solid #f5c2c0;padding:.75rem 1rem;border-radius:6px}\
.notice{background:#e8f4fd;border:1px solid #b6dcf7;padding:.75rem 1rem;border-radius:6px}\
.success{background:#eaf7ec;border:1px solid #b9e2c0;padding:.75rem 1rem;border-radius:6px}\
ul.parts{list-style:none;padding:0}\
ul.parts li{display:flex;justify-content:space-between;padding:.4rem 0;border-bottom:1px solid #eee}\
a{color:#0066cc;text-decoration:none}";

/// Renders the upload form, optionally with an inline error.
pub fn upload_page(
    error: Option<&ErrorPresentation>,
    chunk_size: usize,
    max_upload_bytes: u64,
) -> String {
    let mut body = String::new();

    if let Some(error) = error {
        let _ = write!(
            body,
            "<div class=\"error\" role=\"alert\"><strong>{}</strong><p>{}</p>",
            encode_text(&error.title),
            encode_text(&error.message)
        );
        if let Some(action) = &error.action {
            let _ = write!(body, "<p><em>{}</em></p>", encode_text(action));
        }
        body.push_str("</div>");
    }

    body.push_str(&upload_form(max_upload_bytes));

    layout(
        &format!(
            "Split your CSV file into chunks of {} rows each",
            format_count(chunk_size)
        ),
        &body,
    )
}

/// Renders one download link per part plus a summary.
pub fn results_page(outcome: &SplitOutcome, max_upload_bytes: u64) -> String {
    let mut body = String::new();

    let _ = write!(
        body,
        "<div class=\"notice\">Processed <strong>{}</strong> ({}). Created {} download file{}.</div>\
         <h2>Download Your Split Files</h2><ul class=\"parts\">",
        encode_text(&outcome.source_name),
        encode_text(outcome.encoding),
        outcome.parts.len(),
        if outcome.parts.len() == 1 { "" } else { "s" }
    );

    for part in &outcome.parts {
        let _ = write!(
            body,
            "<li><a href=\"data:text/csv;charset=utf-8;base64,{}\" download=\"{}\">Download {}</a>\
             <span>{} rows</span></li>",
            STANDARD.encode(&part.content),
            encode_double_quoted_attribute(&part.file_name),
            encode_text(&part.file_name),
            format_count(part.rows)
        );
    }

    let _ = write!(
        body,
        "</ul><div class=\"success\">Successfully created {} file{} with {} total rows.</div>",
        outcome.parts.len(),
        if outcome.parts.len() == 1 { "" } else { "s" },
        format_count(outcome.total_rows)
    );

    body.push_str(&upload_form(max_upload_bytes));

    layout(
        &format!(
            "Split your CSV file into chunks of {} rows each",
            format_count(outcome.chunk_size)
        ),
        &body,
    )
}

fn upload_form(max_upload_bytes: u64) -> String {
    format!(
        "<form method=\"post\" action=\"/split\" enctype=\"multipart/form-data\">\
         <label>Upload CSV file <input type=\"file\" name=\"{}\" accept=\".csv,text/csv\" required></label>\
         <button type=\"submit\">Split CSV File</button>\
         <p><small>Maximum size: {:.0} MB</small></p></form>",
        FILE_FIELD,
        max_upload_bytes as f64 / (1024.0 * 1024.0)
    )
}

fn layout(subtitle: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\
         <title>CSV Splitter</title><style>{}</style></head>\
         <body><h1>CSV Splitter</h1><p>{}</p>{}</body></html>",
        STYLE,
        encode_text(subtitle),
        body
    )
}

/// Formats a count with thousands separators: `49999` → `49,999`.
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::SplitPart;
    use crate::ingest::LineEndings;

    fn outcome() -> SplitOutcome {
        SplitOutcome {
            source_name: "<q>.csv".to_string(),
            total_rows: 3,
            chunk_size: 2,
            encoding: "UTF-8",
            line_endings: LineEndings::LF,
            parts: vec![
                SplitPart {
                    index: 1,
                    file_name: "_q__part1.csv".to_string(),
                    rows: 2,
                    content: b"A\n1\n2\n".to_vec(),
                },
                SplitPart {
                    index: 2,
                    file_name: "_q__part2.csv".to_string(),
                    rows: 1,
                    content: b"A\n3\n".to_vec(),
                },
            ],
        }
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(49_999), "49,999");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_upload_page_shows_error() {
        let error = ErrorPresentation {
            title: "Invalid CSV".into(),
            message: "row <3> is broken".into(),
            action: Some("Fix it".into()),
        };
        let html = upload_page(Some(&error), 49_999, 200 * 1024 * 1024);

        assert!(html.contains("class=\"error\""));
        assert!(html.contains("row &lt;3&gt; is broken"));
        assert!(html.contains("Fix it"));
        assert!(html.contains("49,999 rows"));
        assert!(html.contains("Maximum size: 200 MB"));
    }

    #[test]
    fn test_results_page_links_every_part() {
        let html = results_page(&outcome(), 1024);

        assert!(html.contains("download=\"_q__part1.csv\""));
        assert!(html.contains("download=\"_q__part2.csv\""));
        assert!(html.contains(&format!(
            "data:text/csv;charset=utf-8;base64,{}",
            STANDARD.encode(b"A\n1\n2\n")
        )));
        assert!(html.contains("&lt;q&gt;.csv"));
        assert!(!html.contains("<q>"));
        assert!(html.contains("Successfully created 2 files with 3 total rows."));
    }

    #[test]
    fn test_results_page_singular_summary() {
        let mut single = outcome();
        single.parts.truncate(1);
        single.total_rows = 2;

        let html = results_page(&single, 1024);

        assert!(html.contains("Created 1 download file."));
        assert!(html.contains("Successfully created 1 file with 2 total rows."));
    }

    #[test]
    fn test_download_attribute_is_escaped() {
        let mut quoted = outcome();
        quoted.parts[0].file_name = "a\"b<c>_part1.csv".to_string();

        let html = results_page(&quoted, 1024);

        assert!(html.contains("download=\"a&quot;b"));
        assert!(!html.contains("a\"b<c>"));
    }
}
