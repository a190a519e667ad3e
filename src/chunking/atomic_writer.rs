//! Atomic part-file writer with automatic cleanup on failure.
//!
//! A part is staged in a sibling temporary file and only renamed onto its
//! `<stem>_part<N>.csv` name by `finish()`. Dropping an unfinished writer
//! removes the staged file, so a failed CLI split leaves no partial parts.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::AppError;

/// Writes one rendered part to disk without ever exposing a half-written file.
pub struct AtomicFileWriter {
    writer: BufWriter<NamedTempFile>,
    final_path: PathBuf,
}

impl AtomicFileWriter {
    /// Creates a writer targeting `final_path`.
    ///
    /// The temporary file is created next to `final_path` so the final
    /// rename stays on one filesystem.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the parent directory cannot be determined or
    /// the temporary file cannot be created.
    pub fn new(final_path: impl AsRef<Path>) -> Result<Self, AppError> {
        let final_path = final_path.as_ref().to_path_buf();

        let parent_dir = final_path
            .parent()
            .map(|p| if p.as_os_str().is_empty() { Path::new(".") } else { p })
            .ok_or_else(|| {
                AppError::Io(format!(
                    "Cannot determine parent directory for: {}",
                    final_path.display()
                ))
            })?;

        let temp_file = NamedTempFile::new_in(parent_dir)
            .map_err(|e| AppError::Io(format!("Failed to create temporary file: {}", e)))?;

        Ok(Self {
            writer: BufWriter::new(temp_file),
            final_path,
        })
    }

    /// Appends bytes to the pending file.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), AppError> {
        self.writer
            .write_all(bytes)
            .map_err(|e| AppError::Io(format!("Failed to write part: {}", e)))
    }

    /// Flushes all buffers and atomically persists the file to the final path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if flushing or persisting fails. On error, the
    /// temporary file is cleaned up automatically.
    pub fn finish(self) -> Result<PathBuf, AppError> {
        let named_temp = self
            .writer
            .into_inner()
            .map_err(|e| AppError::Io(format!("Failed to flush buffer: {}", e.error())))?;

        named_temp.persist(&self.final_path).map_err(|e| {
            AppError::Io(format!(
                "Failed to persist file to {}: {}",
                self.final_path.display(),
                e.error
            ))
        })?;

        Ok(self.final_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_successful_write() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let final_path = temp_dir.path().join("orders_part1.csv");

        let mut writer = AtomicFileWriter::new(&final_path).expect("Failed to create writer");
        writer.write_bytes(b"Name,Age\r\n").expect("Failed to write header");
        writer.write_bytes(b"Alice,30\r\n").expect("Failed to write row");

        let result_path = writer.finish().expect("Failed to finish");

        assert_eq!(result_path, final_path);
        let content = fs::read_to_string(&final_path).expect("Failed to read file");
        assert_eq!(content, "Name,Age\r\nAlice,30\r\n");
    }

    #[test]
    fn test_drop_cleanup() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let final_path = temp_dir.path().join("orders_part1.csv");

        {
            let mut writer = AtomicFileWriter::new(&final_path).expect("Failed to create writer");
            writer.write_bytes(b"Header\nData\n").expect("Failed to write");
            // Dropped without finish()
        }

        let entries_after: Vec<_> = fs::read_dir(temp_dir.path())
            .expect("Failed to read dir")
            .collect();
        assert!(
            entries_after.is_empty(),
            "Directory should be empty after drop (temp file cleaned up)"
        );
        assert!(!final_path.exists());
    }

    #[test]
    fn test_overwrite_behavior() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let final_path = temp_dir.path().join("orders_part1.csv");
        fs::write(&final_path, "OLD_CONTENT").expect("Failed to write dummy file");

        let mut writer = AtomicFileWriter::new(&final_path).expect("Failed to create writer");
        writer.write_bytes(b"NEW\nDATA\n").expect("Failed to write");
        writer.finish().expect("Failed to finish");

        let content = fs::read_to_string(&final_path).expect("Failed to read file");
        assert_eq!(content, "NEW\nDATA\n");
    }

    #[test]
    fn test_invalid_parent_directory() {
        #[cfg(unix)]
        {
            let result = AtomicFileWriter::new("/");
            assert!(result.is_err(), "Should fail for path with no parent");
        }
    }

    #[test]
    fn test_missing_parent_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let final_path = temp_dir.path().join("missing").join("part.csv");

        let result = AtomicFileWriter::new(&final_path);
        assert!(
            matches!(result, Err(AppError::Io(_))),
            "Expected Io error for a missing parent directory"
        );
    }
}
