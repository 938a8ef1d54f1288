//! Error types for quote document generation.

use std::path::PathBuf;
use thiserror::Error;

/// Broad classification of a [`QuoteError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A specification value is present but not in the expected form.
    Format,
    /// The output directory or an output file could not be created or written.
    Io,
    /// The spreadsheet or PDF serializer rejected the content.
    Render,
    /// A profile file could not be read or decoded.
    Config,
}

/// Main error type for quote generation.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Invalid value for '{field}': expected {expected}, got '{value}'")]
    Format {
        field: String,
        value: String,
        expected: &'static str,
    },

    #[error("Number of FBGs must be between 0 and {max}, got {count}")]
    FbgCount { count: i64, max: usize },

    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuoteError {
    /// Build a format error for a field whose text could not be parsed.
    pub fn format(field: &str, value: &str, expected: &'static str) -> Self {
        QuoteError::Format {
            field: field.to_string(),
            value: value.to_string(),
            expected,
        }
    }

    /// Get the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuoteError::Format { .. } => ErrorKind::Format,
            QuoteError::FbgCount { .. } => ErrorKind::Format,
            QuoteError::CreateDir { .. } => ErrorKind::Io,
            QuoteError::Write { .. } => ErrorKind::Io,
            QuoteError::Io(_) => ErrorKind::Io,
            QuoteError::Read { .. } => ErrorKind::Config,
            QuoteError::Json { .. } => ErrorKind::Config,
            QuoteError::Spreadsheet(_) => ErrorKind::Render,
            QuoteError::Pdf(_) => ErrorKind::Render,
        }
    }

    /// Whether this error came from an unparsable specification value.
    pub fn is_format(&self) -> bool {
        self.kind() == ErrorKind::Format
    }
}

/// Result type alias for quote operations.
pub type Result<T> = std::result::Result<T, QuoteError>;
