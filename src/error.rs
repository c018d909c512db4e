//! Error types for the record-list converter.

use std::path::PathBuf;
use thiserror::Error;

/// The error type for every fallible operation in this crate.
///
/// Per-token lookup failures are not errors; they are reported through
/// [`crate::core::types::Resolution`].
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The pinyin library resource does not exist.
    #[error(
        "{} not found. download it from github or generate it from 'pinyin_library_generator.py'.",
        .path.display()
    )]
    LibraryNotFound { path: PathBuf },

    /// Reading or writing a file failed.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A glyph field cannot be zero bytes wide.
    #[error("Invalid glyph width: {0}. A glyph field must be at least one byte.")]
    InvalidGlyphWidth(usize),

    /// The encoding label is not known to the WHATWG encoding standard.
    #[error("Unknown encoding label: '{0}'")]
    UnknownEncoding(String),

    /// The encoding exists but cannot carry ASCII pinyin keys byte for byte.
    #[error("Unsupported library encoding: {0}")]
    UnsupportedEncoding(&'static str),

    /// The JSON run report could not be produced.
    #[error("Failed to write report '{}': {source}", .path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConvertError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
