/// Core error types for Tonearm
use thiserror::Error;

/// Result type alias using `TonearmError`
pub type Result<T> = std::result::Result<T, TonearmError>;

/// Unified error type crossing crate boundaries
///
/// The engine crates define their own error enums and convert into this
/// type when a caller needs a single error surface (e.g. the enricher seam).
#[derive(Error, Debug)]
pub enum TonearmError {
    /// Metadata extraction errors
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// Content hashing errors
    #[error("Hashing error: {0}")]
    Hashing(String),

    /// Path does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Template or numeric field parse errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// External enrichment errors
    #[error("Enrichment error: {0}")]
    Enrichment(String),

    /// Operation was cancelled
    #[error("Operation cancelled")]
    Cancelled,

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl TonearmError {
    /// Create a metadata error
    pub fn metadata(msg: impl Into<String>) -> Self {
        Self::Metadata(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an enrichment error
    pub fn enrichment(msg: impl Into<String>) -> Self {
        Self::Enrichment(msg.into())
    }
}
