//! Parallel scan pipeline
//!
//! Walks a directory tree, filters by audio extension, and runs the
//! per-file work (stat, tag extraction, content hash) under a counting
//! semaphore. The outcome is a closed [`ScanResult`] sum: `Success`,
//! `Partial`, or `Failure`, so consumers pattern-match instead of catching
//! errors.

#![forbid(unsafe_code)]

mod error;
mod result;
mod scanner;

pub use error::ScanError;
pub use result::{ScanFailure, ScanResult, ScanStats};
pub use scanner::{ScanConfig, Scanner, SUPPORTED_EXTENSIONS};

/// Re-export commonly used types
pub type Result<T> = std::result::Result<T, ScanError>;
