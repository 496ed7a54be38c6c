//! Atomic relocation engine
//!
//! Consumes a `(source path -> metadata)` map plus a target root and a
//! parsed template, generates target paths, and executes per-file atomic
//! moves. A colliding target is displaced to a timestamped backup before
//! the move; a failed move restores the backup. Uncommitted backups stay in
//! the session rollback table for an explicit [`Relocator::rollback_all`].

#![forbid(unsafe_code)]

mod error;
mod events;
mod relocator;
mod rollback;

pub use error::OrganizeError;
pub use events::{EventCallback, OrganizeEvent};
pub use relocator::{RelocateOptions, RelocatedFile, RelocationResult, Relocator};
pub use rollback::RollbackReport;

/// Re-export commonly used types
pub type Result<T> = std::result::Result<T, OrganizeError>;
