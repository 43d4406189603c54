//! Loading documents from disk for the host binary
//!
//! Rejects directories, oversized files and binary content before reading, and
//! normalizes line endings to `\n` since the engine splits on `\n` only.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use thiserror::Error;

/// Maximum file size in bytes (16 MB)
pub const MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Bytes inspected when sniffing for binary content
const SNIFF_LEN: usize = 8192;

#[derive(Debug, Error)]
pub enum FileOpenError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("cannot open directory: {0}")]
    IsDirectory(String),
    #[error("cannot open binary file: {0}")]
    BinaryFile(String),
    #[error("{name} is too large ({size_mb:.1} MB, max {} MB)", MAX_FILE_SIZE / (1024 * 1024))]
    TooLarge { name: String, size_mb: f64 },
    #[error("error reading {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Get the filename from a path for display in error messages
pub fn filename_for_display(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .to_string()
}

fn io_error(path: &Path, e: std::io::Error) -> FileOpenError {
    let name = filename_for_display(path);
    match e.kind() {
        std::io::ErrorKind::NotFound => FileOpenError::NotFound(name),
        std::io::ErrorKind::PermissionDenied => FileOpenError::PermissionDenied(name),
        _ => FileOpenError::Io { name, source: e },
    }
}

/// Check existence, type and size without reading the content.
pub fn validate_file_for_opening(path: &Path) -> Result<(), FileOpenError> {
    let metadata = fs::metadata(path).map_err(|e| io_error(path, e))?;

    if metadata.is_dir() {
        return Err(FileOpenError::IsDirectory(filename_for_display(path)));
    }
    if metadata.len() > MAX_FILE_SIZE {
        return Err(FileOpenError::TooLarge {
            name: filename_for_display(path),
            size_mb: metadata.len() as f64 / (1024.0 * 1024.0),
        });
    }
    Ok(())
}

/// Null bytes in the first few KB mark a file as binary.
/// Read errors report `false` and let the actual read fail instead.
pub fn is_likely_binary(path: &Path) -> bool {
    let Ok(mut file) = File::open(path) else {
        return false;
    };
    let mut buffer = [0u8; SNIFF_LEN];
    let Ok(bytes_read) = file.read(&mut buffer) else {
        return false;
    };
    buffer[..bytes_read].contains(&0)
}

/// Validate and read a text document, with `\r\n` folded to `\n`.
pub fn read_document(path: &Path) -> Result<String, FileOpenError> {
    validate_file_for_opening(path)?;
    if is_likely_binary(path) {
        return Err(FileOpenError::BinaryFile(filename_for_display(path)));
    }
    let bytes = fs::read(path).map_err(|e| io_error(path, e))?;
    let text = String::from_utf8_lossy(&bytes);
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "document read");
    Ok(text.replace("\r\n", "\n"))
}
