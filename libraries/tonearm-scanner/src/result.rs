//! Typed scan outcome
//!
//! The variant reflects exactly the observed counts: `Success` when nothing
//! failed, `Partial` when both lists are non-empty, `Failure` when nothing
//! succeeded (or setup failed before any work was scheduled).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tonearm_core::AudioFile;

/// One per-file failure entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanFailure {
    /// Path that failed
    pub path: PathBuf,

    /// Human-readable cause
    pub message: String,
}

/// Aggregated counters for a completed scan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// Accepted files per lowercased extension
    pub extension_counts: HashMap<String, u64>,

    /// Total bytes across successfully processed files
    pub total_bytes: u64,

    /// Wall-clock time per pipeline phase
    pub phase_timings: HashMap<String, Duration>,
}

/// Closed sum describing a scan's outcome
#[derive(Debug, Clone)]
pub enum ScanResult {
    /// Every scheduled file was processed
    Success {
        files: Vec<AudioFile>,
        stats: ScanStats,
        started_at: DateTime<Utc>,
        duration: Duration,
    },

    /// Some files were processed, some failed
    Partial {
        files: Vec<AudioFile>,
        failed: Vec<ScanFailure>,
        stats: ScanStats,
        started_at: DateTime<Utc>,
        duration: Duration,
    },

    /// Nothing was processed
    Failure {
        message: String,
        failed: Vec<ScanFailure>,
        started_at: DateTime<Utc>,
        duration: Duration,
    },
}

impl ScanResult {
    /// When the scan started
    pub fn started_at(&self) -> DateTime<Utc> {
        match self {
            Self::Success { started_at, .. }
            | Self::Partial { started_at, .. }
            | Self::Failure { started_at, .. } => *started_at,
        }
    }

    /// How long the scan ran
    pub fn duration(&self) -> Duration {
        match self {
            Self::Success { duration, .. }
            | Self::Partial { duration, .. }
            | Self::Failure { duration, .. } => *duration,
        }
    }

    /// Successfully processed files; empty for `Failure`
    pub fn files(&self) -> &[AudioFile] {
        match self {
            Self::Success { files, .. } | Self::Partial { files, .. } => files,
            Self::Failure { .. } => &[],
        }
    }

    /// Per-path failures; empty for `Success`
    pub fn failures(&self) -> &[ScanFailure] {
        match self {
            Self::Success { .. } => &[],
            Self::Partial { failed, .. } | Self::Failure { failed, .. } => failed,
        }
    }

    /// Fraction of scheduled files that were processed successfully
    ///
    /// An empty successful scan counts as 1.0; a failure as 0.0.
    pub fn success_rate(&self) -> f64 {
        let ok = self.files().len();
        let failed = self.failures().len();
        if ok + failed == 0 {
            return match self {
                Self::Failure { .. } => 0.0,
                _ => 1.0,
            };
        }
        ok as f64 / (ok + failed) as f64
    }

    /// Whether every scheduled file was processed
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio_file(path: &str) -> AudioFile {
        AudioFile::new(path, 10, tonearm_core::TrackMetadata::default())
    }

    #[test]
    fn success_rate_reflects_counts() {
        let success = ScanResult::Success {
            files: vec![audio_file("/a.mp3")],
            stats: ScanStats::default(),
            started_at: Utc::now(),
            duration: Duration::from_secs(1),
        };
        assert_eq!(success.success_rate(), 1.0);

        let partial = ScanResult::Partial {
            files: vec![audio_file("/a.mp3"), audio_file("/b.mp3"), audio_file("/c.mp3")],
            failed: vec![ScanFailure {
                path: PathBuf::from("/d.mp3"),
                message: "unreadable".to_string(),
            }],
            stats: ScanStats::default(),
            started_at: Utc::now(),
            duration: Duration::from_secs(1),
        };
        assert_eq!(partial.success_rate(), 0.75);

        let failure = ScanResult::Failure {
            message: "does not exist".to_string(),
            failed: Vec::new(),
            started_at: Utc::now(),
            duration: Duration::ZERO,
        };
        assert_eq!(failure.success_rate(), 0.0);
    }

    #[test]
    fn empty_success_counts_as_full_rate() {
        let empty = ScanResult::Success {
            files: Vec::new(),
            stats: ScanStats::default(),
            started_at: Utc::now(),
            duration: Duration::ZERO,
        };
        assert_eq!(empty.success_rate(), 1.0);
        assert!(empty.is_success());
    }
}
