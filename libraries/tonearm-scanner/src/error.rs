/// Scanner error types
use thiserror::Error;

/// Setup errors that abort a scan before any file is processed
///
/// Per-file errors never surface here: they are captured as entries in the
/// scan result's failure list.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Scan root does not exist
    #[error("Scan root does not exist: {0}")]
    NotFound(String),

    /// Scan root exists but is not a directory
    #[error("Scan root is not a directory: {0}")]
    NotADirectory(String),

    /// Scan was cancelled before any work was scheduled
    #[error("Scan cancelled")]
    Cancelled,

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ScanError> for tonearm_core::TonearmError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::NotFound(path) => tonearm_core::TonearmError::NotFound(path),
            ScanError::NotADirectory(path) => tonearm_core::TonearmError::NotADirectory(path),
            ScanError::Cancelled => tonearm_core::TonearmError::Cancelled,
            ScanError::Io(err) => tonearm_core::TonearmError::Io(err),
        }
    }
}
