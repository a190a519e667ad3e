//! Ingestion of uploaded CSV bytes.
//!
//! Turns a raw upload into a [`Dataset`](crate::dataset::Dataset): the bytes
//! are decoded to text (BOM-aware, UTF-8 with a Windows-1252 fallback), checked
//! for malformed quoting, then parsed strictly so that every row has
//! exactly as many fields as the header.

mod csv_parser;
mod decoder;
mod error;

pub use csv_parser::parse;
pub use decoder::{
    check_quoting, decode_upload, detect_line_endings, DecodedUpload, LineEndings,
};
pub use error::ParseError;
