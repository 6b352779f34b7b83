use thiserror::Error;

/// Main error type for RagEval
#[derive(Error, Debug)]
pub enum RagevalError {
    /// A table that drives a mean has no entries
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using RagevalError
pub type Result<T> = std::result::Result<T, RagevalError>;
