//! Duplicate engine: parallel detectors plus the priority filter

use crate::detectors::{detect_exact_content, detect_metadata_matches, detect_size_buckets};
use crate::report::{DuplicateGroup, DuplicateKind, DuplicateReport, DuplicateStats};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::thread;
use tonearm_core::AudioFile;

/// Default size-bucket cutoff: 1 MiB
const DEFAULT_SIZE_THRESHOLD: u64 = 1024 * 1024;

/// Duplicate engine configuration
#[derive(Debug, Clone)]
pub struct DedupConfig {
    /// Run the metadata-similarity detector
    pub metadata_enabled: bool,

    /// Minimum similarity score in `[0, 1]` for a metadata match
    pub similarity_threshold: f64,

    /// Minimum byte size for the size-bucket detector
    pub size_threshold_bytes: u64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            metadata_enabled: true,
            similarity_threshold: 0.8,
            size_threshold_bytes: DEFAULT_SIZE_THRESHOLD,
        }
    }
}

/// Duplicate engine over a borrowed scan result
pub struct DuplicateAnalyzer {
    config: DedupConfig,
}

impl Default for DuplicateAnalyzer {
    fn default() -> Self {
        Self::new(DedupConfig::default())
    }
}

impl DuplicateAnalyzer {
    /// Create an analyzer with the given configuration
    pub fn new(config: DedupConfig) -> Self {
        Self { config }
    }

    /// Run all three detectors and collapse overlapping findings
    ///
    /// The detectors run as three parallel tasks over the borrowed file
    /// list. The priority order is fixed: exact content beats metadata
    /// similarity beats size collision. The unfiltered per-detector lists
    /// stay on the report.
    pub fn analyze(&self, files: &[AudioFile]) -> DuplicateReport {
        let threshold = self.config.similarity_threshold.clamp(0.0, 1.0);
        let size_cutoff = self.config.size_threshold_bytes;
        let metadata_enabled = self.config.metadata_enabled;

        let (exact_groups, metadata_groups, size_groups) = thread::scope(|scope| {
            let exact = scope.spawn(|| detect_exact_content(files));
            let metadata = scope.spawn(move || {
                if metadata_enabled {
                    detect_metadata_matches(files, threshold)
                } else {
                    Vec::new()
                }
            });
            let size = scope.spawn(move || detect_size_buckets(files, size_cutoff));
            (
                join_detector(exact, "exact-content"),
                join_detector(metadata, "metadata-match"),
                join_detector(size, "size-bucket"),
            )
        });

        let index: HashMap<&Path, &AudioFile> = files
            .iter()
            .map(|file| (file.path.as_path(), file))
            .collect();

        let groups = apply_priority(
            [&exact_groups, &metadata_groups, &size_groups],
            &index,
        );

        let stats = compute_stats(files.len(), &groups);
        tracing::debug!(
            "Duplicate analysis: {} files, {} kept groups, {} wasted bytes",
            files.len(),
            groups.len(),
            stats.total_wasted_bytes
        );

        DuplicateReport {
            groups,
            exact_groups,
            metadata_groups,
            size_groups,
            stats,
        }
    }
}

/// Join one detector thread, degrading to an empty list on panic
fn join_detector(
    handle: thread::ScopedJoinHandle<'_, Vec<DuplicateGroup>>,
    name: &str,
) -> Vec<DuplicateGroup> {
    match handle.join() {
        Ok(groups) => groups,
        Err(_) => {
            tracing::error!("The {name} detector panicked; treating as empty");
            Vec::new()
        }
    }
}

/// Collapse overlapping groups under the fixed priority order
///
/// Walks exact -> metadata -> size. A group whose members are all claimed
/// by earlier groups is dropped; otherwise its claimed members are removed
/// and the group survives if at least two remain.
fn apply_priority(
    tiers: [&Vec<DuplicateGroup>; 3],
    index: &HashMap<&Path, &AudioFile>,
) -> Vec<DuplicateGroup> {
    let mut claimed: HashSet<PathBuf> = HashSet::new();
    let mut kept = Vec::new();

    for tier in tiers {
        for group in tier {
            let members: Vec<PathBuf> = group
                .members
                .iter()
                .filter(|member| !claimed.contains(*member))
                .cloned()
                .collect();
            if members.len() < 2 {
                continue;
            }

            claimed.extend(members.iter().cloned());
            let wasted_bytes = match group.kind {
                DuplicateKind::ExactContent => {
                    group.unit_size_bytes * (members.len() as u64 - 1)
                }
                DuplicateKind::MetadataMatch | DuplicateKind::SizeBucket => 0,
            };
            let suggested_keeper = suggest_keeper(&members, index);

            kept.push(DuplicateGroup {
                kind: group.kind,
                key: group.key.clone(),
                unit_size_bytes: group.unit_size_bytes,
                members,
                wasted_bytes,
                suggested_keeper,
            });
        }
    }

    kept
}

/// Pick the member worth keeping
///
/// Richest metadata first; ties break on shorter path, then
/// case-insensitive path order.
fn suggest_keeper(
    members: &[PathBuf],
    index: &HashMap<&Path, &AudioFile>,
) -> Option<PathBuf> {
    members
        .iter()
        .min_by(|a, b| {
            let fields_a = index
                .get(a.as_path())
                .map_or(0, |file| file.metadata.filled_field_count());
            let fields_b = index
                .get(b.as_path())
                .map_or(0, |file| file.metadata.filled_field_count());
            fields_b
                .cmp(&fields_a)
                .then_with(|| {
                    a.as_os_str()
                        .len()
                        .cmp(&b.as_os_str().len())
                })
                .then_with(|| {
                    a.to_string_lossy()
                        .to_lowercase()
                        .cmp(&b.to_string_lossy().to_lowercase())
                })
        })
        .cloned()
}

/// Aggregate statistics over the kept groups
fn compute_stats(total_files: usize, kept: &[DuplicateGroup]) -> DuplicateStats {
    let total_duplicate_files: usize = kept.iter().map(|group| group.members.len() - 1).sum();
    let total_wasted_bytes: u64 = kept
        .iter()
        .filter(|group| group.kind == DuplicateKind::ExactContent)
        .map(|group| group.wasted_bytes)
        .sum();
    let duplicate_percentage = if total_files == 0 {
        0.0
    } else {
        total_duplicate_files as f64 / total_files as f64 * 100.0
    };

    DuplicateStats {
        total_files_analyzed: total_files,
        total_duplicate_files,
        duplicate_percentage,
        total_wasted_bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonearm_core::TrackMetadata;

    #[test]
    fn keeper_prefers_richer_metadata() {
        let rich = AudioFile::new(
            "/library/long/path/song.mp3",
            10,
            TrackMetadata::builder()
                .title("Song")
                .artist("Band")
                .album("Album")
                .build(),
        );
        let poor = AudioFile::new("/x/s.mp3", 10, TrackMetadata::default());
        let files = vec![rich, poor];
        let index: HashMap<&Path, &AudioFile> = files
            .iter()
            .map(|file| (file.path.as_path(), file))
            .collect();
        let members: Vec<PathBuf> = files.iter().map(|file| file.path.clone()).collect();

        assert_eq!(
            suggest_keeper(&members, &index),
            Some(PathBuf::from("/library/long/path/song.mp3"))
        );
    }

    #[test]
    fn keeper_tie_breaks_on_shorter_path() {
        let a = AudioFile::new("/music/aaaa/song.mp3", 10, TrackMetadata::default());
        let b = AudioFile::new("/music/b/song.mp3", 10, TrackMetadata::default());
        let files = vec![a, b];
        let index: HashMap<&Path, &AudioFile> = files
            .iter()
            .map(|file| (file.path.as_path(), file))
            .collect();
        let members: Vec<PathBuf> = files.iter().map(|file| file.path.clone()).collect();

        assert_eq!(
            suggest_keeper(&members, &index),
            Some(PathBuf::from("/music/b/song.mp3"))
        );
    }

    #[test]
    fn stats_on_empty_input() {
        let stats = compute_stats(0, &[]);
        assert_eq!(stats.total_duplicate_files, 0);
        assert_eq!(stats.duplicate_percentage, 0.0);
    }
}
