//! Validation report types

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

/// What kind of problem an issue describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingMetadata,
    CorruptFile,
    DuplicateFile,
    IncompleteAlbum,
    InvalidFilename,
    MissingCoverArt,
    InconsistentMetadata,
    LowQualityAudio,
}

/// How serious an issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

/// One validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Problem category
    pub kind: IssueKind,

    /// Seriousness
    pub severity: Severity,

    /// Affected file
    pub path: PathBuf,

    /// Human-readable description
    pub message: String,

    /// Suggested remediation, when one is obvious
    pub remediation: Option<String>,
}

/// Completeness of one (artist, album) group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumCompleteness {
    pub artist: String,
    pub album: String,

    /// Declared total when any member declares one, else the highest
    /// observed track number
    pub expected_total: u32,

    /// Track numbers seen in the collection
    pub present_tracks: BTreeSet<u32>,

    /// Track numbers missing from `1..=expected_total`
    pub missing_tracks: Vec<u32>,

    /// `true` iff nothing is missing and at least one track is present
    pub complete: bool,
}

/// Outcome of one validation pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    /// All findings, in file order
    pub issues: Vec<ValidationIssue>,

    /// Per-album completeness records
    pub albums: Vec<AlbumCompleteness>,

    /// Files examined
    pub files_checked: usize,

    /// Wall-clock time of the pass
    pub duration: Duration,
}

impl ValidationReport {
    /// Findings of one kind
    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |issue| issue.kind == kind)
    }

    /// Number of findings at or above a severity
    pub fn count_at_least(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity >= severity)
            .count()
    }

    /// Whether nothing at all was flagged
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}
