/// Metadata-specific errors
use thiserror::Error;

/// Metadata error types
#[derive(Error, Debug)]
pub enum MetadataError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Tag extraction error
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// Content hashing error
    #[error("Hashing failed: {0}")]
    HashingFailed(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Lofty error
    #[error(transparent)]
    Lofty(#[from] lofty::error::LoftyError),
}

impl From<MetadataError> for tonearm_core::TonearmError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::HashingFailed(msg) => tonearm_core::TonearmError::Hashing(msg),
            other => tonearm_core::TonearmError::metadata(other.to_string()),
        }
    }
}
