//! Directory walk and parallel per-file pipeline

use crate::error::ScanError;
use crate::result::{ScanFailure, ScanResult, ScanStats};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tonearm_core::progress::{operations, ObserverExt};
use tonearm_core::{AudioFile, CancellationFlag, SharedObserver};
use walkdir::WalkDir;

/// Default audio extensions accepted by the walk (case-insensitive)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "flac", "m4a", "mp4", "ogg", "wav"];

/// Scanner configuration, carried by value into each scan
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Cap on simultaneous open+read+hash operations (>= 1)
    pub max_concurrent_files: usize,

    /// Whether to compute a SHA-256 content digest per file
    pub compute_digest: bool,

    /// Recurse into subdirectories; `false` scans only the root itself
    pub deep_scan: bool,

    /// Follow symbolic links during the walk
    pub follow_symlinks: bool,

    /// Accepted extensions, lowercased
    pub extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_concurrent_files: num_cpus::get(),
            compute_digest: true,
            deep_scan: true,
            follow_symlinks: false,
            extensions: SUPPORTED_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
        }
    }
}

/// Parallel collection scanner
pub struct Scanner {
    config: ScanConfig,
    observer: Option<SharedObserver>,
    cancel: CancellationFlag,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

impl Scanner {
    /// Create a scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            observer: None,
            cancel: CancellationFlag::new(),
        }
    }

    /// Attach a progress observer
    pub fn with_observer(mut self, observer: SharedObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Share a cancellation flag with the caller
    pub fn with_cancellation(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Scan a directory tree into a typed result
    ///
    /// Setup problems (missing root, root not a directory) yield a
    /// `Failure`. Per-file problems become failure entries and never abort
    /// the batch.
    pub async fn scan(&self, root: &Path) -> ScanResult {
        let started_at = Utc::now();
        let clock = Instant::now();

        if let Err(setup) = verify_root(root) {
            return ScanResult::Failure {
                message: setup.to_string(),
                failed: Vec::new(),
                started_at,
                duration: clock.elapsed(),
            };
        }

        let mut stats = ScanStats::default();
        let mut failed: Vec<ScanFailure> = Vec::new();

        // Phase 1: walk the tree and filter by extension
        let walk_clock = Instant::now();
        let accepted = self.walk(root, &mut failed);
        stats
            .phase_timings
            .insert("directory_walk".to_string(), walk_clock.elapsed());

        self.observer
            .report_start(operations::FILE_SCAN, accepted.len() as u64);

        // Phase 2: per-file stat -> extract -> hash, bounded by a semaphore
        let processing_clock = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_files.max(1)));
        let completed = Arc::new(AtomicU64::new(0));
        let mut handles = Vec::with_capacity(accepted.len());

        for path in accepted {
            if self.cancel.is_cancelled() {
                // Unscheduled work is surfaced as failure entries so the
                // result collapses to Partial rather than silently Success
                failed.push(ScanFailure {
                    path,
                    message: "cancelled".to_string(),
                });
                continue;
            }

            let semaphore = semaphore.clone();
            let observer = self.observer.clone();
            let completed = completed.clone();
            let compute_digest = self.config.compute_digest;
            let task_path = path.clone();

            let handle = tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire().await else {
                    return Err("worker pool closed".to_string());
                };
                let result = process_file(&task_path, compute_digest);
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                observer.report_update(operations::FILE_SCAN, done);
                result
            });
            handles.push((path, handle));
        }

        let mut files = Vec::with_capacity(handles.len());
        for (path, handle) in handles {
            match handle.await {
                Ok(Ok(file)) => files.push(file),
                Ok(Err(message)) => {
                    tracing::warn!("Failed to process {:?}: {}", path, message);
                    failed.push(ScanFailure { path, message });
                }
                Err(join_error) => {
                    tracing::error!("Scan worker panicked for {:?}: {}", path, join_error);
                    failed.push(ScanFailure {
                        path,
                        message: format!("worker panicked: {join_error}"),
                    });
                }
            }
        }
        stats
            .phase_timings
            .insert("file_processing".to_string(), processing_clock.elapsed());

        // Phase 3: aggregate counters
        let aggregation_clock = Instant::now();
        for file in &files {
            if let Some(ext) = file.extension() {
                *stats.extension_counts.entry(ext).or_insert(0) += 1;
            }
            stats.total_bytes += file.size_bytes;
        }
        stats
            .phase_timings
            .insert("aggregation".to_string(), aggregation_clock.elapsed());

        self.observer.report_complete(operations::FILE_SCAN);

        let duration = clock.elapsed();
        tracing::info!(
            "Scan of {:?} finished in {:?}: {} ok, {} failed, {} bytes",
            root,
            duration,
            files.len(),
            failed.len(),
            stats.total_bytes
        );

        match (files.is_empty(), failed.is_empty()) {
            (_, true) => ScanResult::Success {
                files,
                stats,
                started_at,
                duration,
            },
            (false, false) => ScanResult::Partial {
                files,
                failed,
                stats,
                started_at,
                duration,
            },
            (true, false) => ScanResult::Failure {
                message: format!("all {} scheduled files failed", failed.len()),
                failed,
                started_at,
                duration,
            },
        }
    }

    /// Scan an explicit list of files instead of walking a tree
    ///
    /// Paths that are missing, not regular files, or carry an unsupported
    /// extension become failure entries; the rest go through the same
    /// bounded pipeline as a directory scan.
    pub async fn scan_files(&self, paths: &[PathBuf]) -> ScanResult {
        let started_at = Utc::now();
        let clock = Instant::now();

        let mut stats = ScanStats::default();
        let mut failed: Vec<ScanFailure> = Vec::new();
        let mut accepted = Vec::with_capacity(paths.len());
        for path in paths {
            if !path.is_file() {
                failed.push(ScanFailure {
                    path: path.clone(),
                    message: "not a regular file".to_string(),
                });
            } else if !self.is_supported(path) {
                failed.push(ScanFailure {
                    path: path.clone(),
                    message: "unsupported extension".to_string(),
                });
            } else {
                accepted.push(path.clone());
            }
        }

        self.observer
            .report_start(operations::FILE_SCAN, accepted.len() as u64);

        let processing_clock = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_files.max(1)));
        let completed = Arc::new(AtomicU64::new(0));
        let mut handles = Vec::with_capacity(accepted.len());

        for path in accepted {
            if self.cancel.is_cancelled() {
                failed.push(ScanFailure {
                    path,
                    message: "cancelled".to_string(),
                });
                continue;
            }

            let semaphore = semaphore.clone();
            let observer = self.observer.clone();
            let completed = completed.clone();
            let compute_digest = self.config.compute_digest;
            let task_path = path.clone();

            let handle = tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire().await else {
                    return Err("worker pool closed".to_string());
                };
                let result = process_file(&task_path, compute_digest);
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                observer.report_update(operations::FILE_SCAN, done);
                result
            });
            handles.push((path, handle));
        }

        let mut files = Vec::with_capacity(handles.len());
        for (path, handle) in handles {
            match handle.await {
                Ok(Ok(file)) => files.push(file),
                Ok(Err(message)) => failed.push(ScanFailure { path, message }),
                Err(join_error) => failed.push(ScanFailure {
                    path,
                    message: format!("worker panicked: {join_error}"),
                }),
            }
        }
        stats
            .phase_timings
            .insert("file_processing".to_string(), processing_clock.elapsed());

        for file in &files {
            if let Some(ext) = file.extension() {
                *stats.extension_counts.entry(ext).or_insert(0) += 1;
            }
            stats.total_bytes += file.size_bytes;
        }

        self.observer.report_complete(operations::FILE_SCAN);

        let duration = clock.elapsed();
        match (files.is_empty(), failed.is_empty()) {
            (_, true) => ScanResult::Success {
                files,
                stats,
                started_at,
                duration,
            },
            (false, false) => ScanResult::Partial {
                files,
                failed,
                stats,
                started_at,
                duration,
            },
            (true, false) => ScanResult::Failure {
                message: format!("all {} scheduled files failed", failed.len()),
                failed,
                started_at,
                duration,
            },
        }
    }

    /// Walk the tree, collecting accepted audio paths
    fn walk(&self, root: &Path, failed: &mut Vec<ScanFailure>) -> Vec<PathBuf> {
        let mut walker = WalkDir::new(root).follow_links(self.config.follow_symlinks);
        if !self.config.deep_scan {
            walker = walker.max_depth(1);
        }

        let mut accepted = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    if self.is_supported(entry.path()) {
                        accepted.push(entry.path().to_path_buf());
                    }
                }
                Err(err) => {
                    // Unreadable directory entries are per-path failures
                    let path = err
                        .path()
                        .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                    failed.push(ScanFailure {
                        path,
                        message: err.to_string(),
                    });
                }
            }
        }
        accepted
    }

    /// Check the lowercased extension against the accepted set
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .is_some_and(|ext| self.config.extensions.contains(&ext))
    }
}

/// Verify the scan root is an existing directory
fn verify_root(root: &Path) -> crate::Result<()> {
    if !root.exists() {
        return Err(ScanError::NotFound(root.display().to_string()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.display().to_string()));
    }
    Ok(())
}

/// Stat, extract, and optionally hash one file
///
/// A hashing failure does not sink the file: it stays usable for the size
/// and metadata duplicate axes with an absent digest.
fn process_file(path: &Path, compute_digest: bool) -> std::result::Result<AudioFile, String> {
    let fs_meta = std::fs::metadata(path).map_err(|e| e.to_string())?;
    let modified: DateTime<Utc> = fs_meta
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());

    let metadata = tonearm_metadata::extract_metadata(path).map_err(|e| e.to_string())?;

    let mut file = AudioFile::new(path, fs_meta.len(), metadata).with_modified(modified);
    if compute_digest {
        match tonearm_metadata::calculate_file_hash(path) {
            Ok(digest) => file = file.with_hash(digest),
            Err(err) => {
                tracing::warn!("Digest unavailable for {:?}: {}", path, err);
            }
        }
    }
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_extensions_match_the_supported_set() {
        let config = ScanConfig::default();
        for ext in ["mp3", "flac", "m4a", "mp4", "ogg", "wav"] {
            assert!(config.extensions.contains(&ext.to_string()));
        }
    }

    #[test]
    fn extension_filter_is_case_insensitive() {
        let scanner = Scanner::default();
        assert!(scanner.is_supported(Path::new("/music/a.MP3")));
        assert!(scanner.is_supported(Path::new("/music/a.Flac")));
        assert!(!scanner.is_supported(Path::new("/music/a.txt")));
        assert!(!scanner.is_supported(Path::new("/music/noext")));
    }

    #[test]
    fn missing_root_is_a_setup_error() {
        assert!(matches!(
            verify_root(Path::new("/definitely/not/here")),
            Err(ScanError::NotFound(_))
        ));
    }
}
