use std::io;
use std::path::Path;

use thiserror::Error;

/// Errors that can occur while decoding, mixing, or encoding tracks.
///
/// The mixing stages themselves never fail: ranges are clamped, not rejected.
/// `InvalidRange` and `InvalidSettings` come only from the opt-in
/// `validate()` helpers and from profile-name parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("I/O failure: {0}")]
    IoFailure(String),

    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("metadata error: {0}")]
    MetadataFailed(String),
}

impl MergeError {
    /// Map an I/O error on `path` to `FileNotFound` or `IoFailure`.
    pub(crate) fn from_io(err: io::Error, context: &str, path: &Path) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            MergeError::FileNotFound(path.display().to_string())
        } else {
            MergeError::IoFailure(format!("{} {}: {}", context, path.display(), err))
        }
    }
}
