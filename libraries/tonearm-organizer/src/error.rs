/// Relocation error types
use thiserror::Error;

/// Errors raised while organizing files
///
/// Per-file errors are captured as entries in the relocation result; only
/// setup problems (an invalid template, a missing target root) abort the
/// call itself.
#[derive(Error, Debug)]
pub enum OrganizeError {
    /// Template failed to parse or evaluate
    #[error("Pattern error: {0}")]
    Pattern(#[from] tonearm_pattern::PatternError),

    /// Two items resolved to the same target path
    #[error("Target collision: {0}")]
    TargetCollision(String),

    /// The source -> target rename failed
    #[error("Move failed: {0}")]
    MoveFailed(String),

    /// Displacing an existing target to its backup failed
    #[error("Backup failed: {0}")]
    BackupFailed(String),

    /// Restoring a backup over its target failed
    #[error("Rollback failed: {0}")]
    RollbackFailed(String),

    /// Relocation cancelled
    #[error("Relocation cancelled")]
    Cancelled,

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<OrganizeError> for tonearm_core::TonearmError {
    fn from(err: OrganizeError) -> Self {
        match err {
            OrganizeError::Pattern(inner) => inner.into(),
            OrganizeError::Cancelled => tonearm_core::TonearmError::Cancelled,
            OrganizeError::Io(inner) => tonearm_core::TonearmError::Io(inner),
            other => tonearm_core::TonearmError::Other(other.to_string()),
        }
    }
}
