//! Duplicate report types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which detector produced a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKind {
    /// Identical content digests
    ExactContent,

    /// Metadata similarity at or above the configured threshold
    MetadataMatch,

    /// Identical byte size among files above the size cutoff
    SizeBucket,
}

/// A set of at least two files considered duplicates of each other
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Producing detector
    pub kind: DuplicateKind,

    /// Stable group key: the digest, the normalized metadata signature, or
    /// `"size:"` plus the decimal byte count
    pub key: String,

    /// Size of one member in bytes
    pub unit_size_bytes: u64,

    /// Member paths, always at least two
    pub members: Vec<PathBuf>,

    /// Reclaimable bytes: `unit_size * (members - 1)` for exact-content
    /// groups, zero otherwise
    pub wasted_bytes: u64,

    /// The member worth keeping: richest metadata, then shortest path
    pub suggested_keeper: Option<PathBuf>,
}

/// Aggregate duplicate statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DuplicateStats {
    /// Files fed into the engine
    pub total_files_analyzed: usize,

    /// Redundant copies across kept groups: sum of `members - 1`
    pub total_duplicate_files: usize,

    /// Redundant copies as a percentage of analyzed files
    pub duplicate_percentage: f64,

    /// Reclaimable bytes across kept exact-content groups
    pub total_wasted_bytes: u64,
}

/// Outcome of one duplicate analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DuplicateReport {
    /// Groups surviving the priority filter, in priority order
    pub groups: Vec<DuplicateGroup>,

    /// Unfiltered exact-content groups
    pub exact_groups: Vec<DuplicateGroup>,

    /// Unfiltered metadata-match groups
    pub metadata_groups: Vec<DuplicateGroup>,

    /// Unfiltered size-bucket groups
    pub size_groups: Vec<DuplicateGroup>,

    /// Aggregate statistics over the kept groups
    pub stats: DuplicateStats,
}

impl DuplicateReport {
    /// Whether any duplicates survived the priority filter
    pub fn has_duplicates(&self) -> bool {
        !self.groups.is_empty()
    }

    /// Kept groups of one kind
    pub fn groups_of(&self, kind: DuplicateKind) -> impl Iterator<Item = &DuplicateGroup> {
        self.groups.iter().filter(move |group| group.kind == kind)
    }

    /// One-line human summary of the analysis
    pub fn summary_text(&self) -> String {
        format!(
            "Analyzed {} files: {} duplicate groups, {} redundant copies ({:.1}%), {} reclaimable",
            self.stats.total_files_analyzed,
            self.groups.len(),
            self.stats.total_duplicate_files,
            self.stats.duplicate_percentage,
            format_bytes(self.stats.total_wasted_bytes)
        )
    }
}

/// Render a byte count with a binary unit suffix
fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
