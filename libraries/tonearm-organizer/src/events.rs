//! Relocation event stream
//!
//! The three event cases are a closed sum delivered through an optional
//! callback; consumers match instead of subclassing.

use std::path::PathBuf;
use std::sync::Arc;

/// One relocation event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrganizeEvent {
    /// The template resolved a target for a source during the pre-pass
    PatternResolved { source: PathBuf, target: PathBuf },

    /// A file was moved to its target
    FileOrganized { source: PathBuf, target: PathBuf },

    /// A per-file move failed
    Failed { source: PathBuf, message: String },
}

/// Callback invoked for every event, shared across worker tasks
pub type EventCallback = Arc<dyn Fn(&OrganizeEvent) + Send + Sync>;
