/// Template parsing errors
use thiserror::Error;

/// Errors returned (never raised mid-evaluation) by template validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// Template string is empty or contains no segments
    #[error("Template is empty")]
    EmptyTemplate,

    /// A `{` without `}` or a stray `}`
    #[error("Unbalanced braces in template: {0}")]
    UnbalancedBraces(String),

    /// A substitution names no known variable
    #[error("Unknown template variable: {0}")]
    UnknownVariable(String),
}

impl From<PatternError> for tonearm_core::TonearmError {
    fn from(err: PatternError) -> Self {
        tonearm_core::TonearmError::Parse(err.to_string())
    }
}
