//! Duplicate detection across three orthogonal axes
//!
//! - **Exact content**: same SHA-256 digest
//! - **Metadata match**: five-field similarity over normalized tag values
//! - **Size bucket**: identical byte size among large files
//!
//! The three detectors run in parallel over the scan result, which the
//! engine borrows read-only. Overlapping findings collapse under a fixed
//! priority (exact > metadata > size); the raw per-detector lists stay
//! available on the report.

#![forbid(unsafe_code)]

mod analyzer;
mod detectors;
mod report;

pub use analyzer::{DedupConfig, DuplicateAnalyzer};
pub use detectors::normalize_field;
pub use report::{DuplicateGroup, DuplicateKind, DuplicateReport, DuplicateStats};
