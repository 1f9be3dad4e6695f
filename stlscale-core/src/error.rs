//! Error type shared by every stage of the scaling pipeline
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for STL loading, transforming and saving.
pub type Result<T> = std::result::Result<T, StlError>;

#[derive(Debug, Error)]
pub enum StlError {
    #[error("input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// A triangle record was not exactly 50 bytes long.
    #[error("malformed triangle record: expected 50 bytes, got {len}")]
    MalformedRecord { len: usize },

    /// Fewer than 84 bytes (80-byte header plus triangle count) were available.
    #[error("truncated STL header: expected 84 bytes, got {len}")]
    TruncatedHeader { len: usize },

    #[error("truncated STL body: expected {expected} bytes of triangle data, got {available}")]
    TruncatedBody { expected: u64, available: u64 },

    #[error("invalid scaling method {0} (expected 0: None | 1: Sqrt)")]
    InvalidMethod(i64),

    #[error("destination already exists: {}", path.display())]
    DestinationExists { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
