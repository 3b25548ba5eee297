//! Error handling module for clipbatch

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for clipbatch operations
#[derive(Error, Debug)]
pub enum ClipError {
    /// Input file not found or request otherwise malformed; rejected before
    /// any subprocess is spawned
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// External tool exited with a non-zero status
    #[error("{tool} failed: {stderr}")]
    ToolFailure { tool: String, stderr: String },

    /// External tool exceeded its wall-clock timeout
    #[error("{tool} timed out after {seconds}s")]
    Timeout { tool: String, seconds: u64 },

    /// Concat manifest could not be written
    #[error("Failed to write concat manifest: {0}")]
    Manifest(String),

    /// Media probe error
    #[error("Failed to probe media file: {message}")]
    ProbeError { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClipError {
    /// Invalid-input error for a path that does not exist on disk.
    pub fn missing_file(path: &std::path::Path) -> Self {
        ClipError::InvalidInput {
            message: format!("file not found: {}", path.display()),
        }
    }

    /// True when the error should trigger the fallback tier of a two-tier
    /// operation. Tool failure and timeout both do; invalid input never does.
    pub fn triggers_fallback(&self) -> bool {
        matches!(self, ClipError::ToolFailure { .. } | ClipError::Timeout { .. })
    }
}

/// Result type alias for clipbatch operations
pub type ClipResult<T> = std::result::Result<T, ClipError>;

/// Reject a missing path before spawning anything.
pub fn require_file(path: &std::path::Path) -> ClipResult<PathBuf> {
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(ClipError::missing_file(path))
    }
}
