//! Splitting parsed uploads into self-contained CSV parts.
//!
//! This module provides record-aware chunking that repeats the header in
//! every part and renders parts without altering any cell, as well as
//! atomic file writing with automatic cleanup on failure.

mod atomic_writer;
mod csv_chunker;

pub use atomic_writer::AtomicFileWriter;
pub use csv_chunker::{chunk_file_name, render, split, Chunk, ChunkSize, LineEndingPolicy};
