//! Per-file atomic moves with backup and recovery

use crate::error::OrganizeError;
use crate::events::{EventCallback, OrganizeEvent};
use crate::rollback::{RollbackReport, RollbackTable};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tonearm_core::progress::{operations, ObserverExt};
use tonearm_core::{CancellationFlag, SharedObserver, TrackMetadata};
use tonearm_pattern::{PatternContext, PatternOptions, Template};

/// Relocation options, carried by value into each call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelocateOptions {
    /// Create missing parent directories under the target root
    pub create_parents: bool,

    /// Keep processing the batch after a per-file failure; `false` stops
    /// scheduling new moves once one fails
    pub preserve_on_error: bool,

    /// Displace colliding targets to a timestamped backup before moving
    pub rollback_enabled: bool,

    /// Move with an atomic rename; `false` falls back to copy-then-delete
    pub atomic_move: bool,

    /// Without rollback, allow the move to clobber an existing target
    pub replace_existing: bool,

    /// Cap on simultaneous moves (>= 1)
    pub max_concurrent_moves: usize,
}

impl Default for RelocateOptions {
    fn default() -> Self {
        Self {
            create_parents: true,
            preserve_on_error: true,
            rollback_enabled: true,
            atomic_move: true,
            replace_existing: false,
            max_concurrent_moves: 8,
        }
    }
}

/// One completed move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocatedFile {
    /// Original path
    pub source: PathBuf,

    /// New path under the target root
    pub target: PathBuf,
}

/// Outcome of one relocation call
#[derive(Debug, Default)]
pub struct RelocationResult {
    /// Files moved to their targets
    pub organized: Vec<RelocatedFile>,

    /// Per-path failures; these never aborted the batch
    pub failed: Vec<(PathBuf, String)>,

    /// Wall-clock time for the whole call
    pub duration: Duration,
}

impl RelocationResult {
    /// Whether every item was moved
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Atomic relocation engine for one target tree
///
/// The template is parsed once and shared read-only across the per-file
/// worker tasks. The relocator exclusively owns the session rollback table
/// until it is cleared on commit or drained by [`rollback_all`].
///
/// [`rollback_all`]: Relocator::rollback_all
pub struct Relocator {
    target_root: PathBuf,
    template: Arc<Template>,
    options: RelocateOptions,
    rollback: RollbackTable,
    observer: Option<SharedObserver>,
    on_event: Option<EventCallback>,
    cancel: CancellationFlag,
}

impl Relocator {
    /// Create a relocator for a target root and parsed template
    pub fn new(
        target_root: impl Into<PathBuf>,
        template: Template,
        options: RelocateOptions,
    ) -> Self {
        Self {
            target_root: target_root.into(),
            template: Arc::new(template),
            options,
            rollback: RollbackTable::new(),
            observer: None,
            on_event: None,
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

    /// Register an event callback
    pub fn on_event(mut self, callback: impl Fn(&OrganizeEvent) + Send + Sync + 'static) -> Self {
        self.on_event = Some(Arc::new(callback));
        self
    }

    /// Number of uncommitted rollback entries left by previous calls
    pub fn pending_rollbacks(&self) -> usize {
        self.rollback.len()
    }

    /// Relocate every item into the target tree
    ///
    /// Targets are generated in a pre-pass; items resolving to the same
    /// target all fail with a collision error instead of racing. Per-file
    /// failures become entries in the result and never abort the batch.
    pub async fn relocate(
        &self,
        items: &HashMap<PathBuf, TrackMetadata>,
    ) -> RelocationResult {
        let clock = Instant::now();
        let mut result = RelocationResult::default();

        // Pre-pass: resolve every target before touching the filesystem
        let plan = self.build_plan(items, &mut result);

        self.observer
            .report_start(operations::FILE_ORGANIZATION, plan.len() as u64);

        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrent_moves.max(1)));
        let completed = Arc::new(AtomicU64::new(0));
        let halted = Arc::new(AtomicBool::new(false));
        let mut handles = Vec::with_capacity(plan.len());

        for (source, target) in plan {
            if self.cancel.is_cancelled() {
                result.failed.push((source, "cancelled".to_string()));
                continue;
            }

            let semaphore = semaphore.clone();
            let completed = completed.clone();
            let halted = halted.clone();
            let observer = self.observer.clone();
            let on_event = self.on_event.clone();
            let rollback = self.rollback.clone();
            let options = self.options.clone();

            let handle = tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire().await else {
                    return (source, target, Err("worker pool closed".to_string()));
                };
                if halted.load(Ordering::SeqCst) {
                    return (source, target, Err("skipped after earlier failure".to_string()));
                }

                let moved = move_one(&source, &target, &options, &rollback)
                    .map_err(|err| err.to_string());
                if moved.is_err() && !options.preserve_on_error {
                    halted.store(true, Ordering::SeqCst);
                }

                match &moved {
                    Ok(()) => {
                        if let Some(callback) = &on_event {
                            callback(&OrganizeEvent::FileOrganized {
                                source: source.clone(),
                                target: target.clone(),
                            });
                        }
                    }
                    Err(message) => {
                        if let Some(callback) = &on_event {
                            callback(&OrganizeEvent::Failed {
                                source: source.clone(),
                                message: message.clone(),
                            });
                        }
                    }
                }

                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                observer.report_update(operations::FILE_ORGANIZATION, done);
                (source, target, moved)
            });
            handles.push(handle);
        }

        for handle in handles {
            match handle.await {
                Ok((source, target, Ok(()))) => {
                    result.organized.push(RelocatedFile { source, target });
                }
                Ok((source, _, Err(message))) => {
                    tracing::warn!("Failed to relocate {:?}: {}", source, message);
                    result.failed.push((source, message));
                }
                Err(join_error) => {
                    tracing::error!("Relocation worker panicked: {}", join_error);
                }
            }
        }

        self.observer.report_complete(operations::FILE_ORGANIZATION);
        result.duration = clock.elapsed();
        tracing::info!(
            "Relocation finished in {:?}: {} moved, {} failed",
            result.duration,
            result.organized.len(),
            result.failed.len()
        );
        result
    }

    /// Restore every uncommitted backup over its target
    ///
    /// Per-entry failures are reported without stopping iteration, and the
    /// table is cleared regardless, which makes the call idempotent.
    pub fn rollback_all(&self) -> RollbackReport {
        self.rollback.drain_and_restore()
    }

    /// Resolve targets for every item and reject colliding ones
    fn build_plan(
        &self,
        items: &HashMap<PathBuf, TrackMetadata>,
        result: &mut RelocationResult,
    ) -> Vec<(PathBuf, PathBuf)> {
        self.observer
            .report_start(operations::PATTERN_ORGANIZATION, items.len() as u64);

        // Deterministic order keeps collision reporting stable
        let mut sources: Vec<&PathBuf> = items.keys().collect();
        sources.sort();

        let mut resolved: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(sources.len());
        let mut target_counts: HashMap<PathBuf, usize> = HashMap::new();
        for (index, source) in sources.into_iter().enumerate() {
            let metadata = &items[source];
            let context =
                PatternContext::with_options(metadata, source, PatternOptions::default());
            let target = self.target_root.join(self.template.evaluate_path(&context));

            if let Some(callback) = &self.on_event {
                callback(&OrganizeEvent::PatternResolved {
                    source: source.clone(),
                    target: target.clone(),
                });
            }
            *target_counts.entry(target.clone()).or_insert(0) += 1;
            resolved.push((source.clone(), target));
            self.observer
                .report_update(operations::PATTERN_ORGANIZATION, index as u64 + 1);
        }
        self.observer
            .report_complete(operations::PATTERN_ORGANIZATION);

        let mut plan = Vec::with_capacity(resolved.len());
        for (source, target) in resolved {
            if target_counts[&target] > 1 {
                let message =
                    OrganizeError::TargetCollision(target.display().to_string()).to_string();
                if let Some(callback) = &self.on_event {
                    callback(&OrganizeEvent::Failed {
                        source: source.clone(),
                        message: message.clone(),
                    });
                }
                result.failed.push((source, message));
            } else {
                plan.push((source, target));
            }
        }
        plan
    }
}

/// Execute the per-file move procedure
///
/// Backup (when the target exists and rollback is enabled), rename, then
/// commit the backup or restore it. A restore that itself fails leaves the
/// entry in the table for a later bulk rollback.
fn move_one(
    source: &Path,
    target: &Path,
    options: &RelocateOptions,
    rollback: &RollbackTable,
) -> crate::Result<()> {
    if options.create_parents {
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut backup: Option<PathBuf> = None;
    if target.exists() {
        if options.rollback_enabled {
            let backup_path = backup_path_for(target);
            std::fs::rename(target, &backup_path).map_err(|err| {
                OrganizeError::BackupFailed(format!("{}: {err}", target.display()))
            })?;
            rollback.insert(target.to_path_buf(), backup_path.clone());
            backup = Some(backup_path);
        } else if !options.replace_existing {
            return Err(OrganizeError::MoveFailed(format!(
                "target already exists: {}",
                target.display()
            )));
        }
    }

    let moved = if options.atomic_move {
        std::fs::rename(source, target).map_err(|err| {
            OrganizeError::MoveFailed(format!("{} -> {}: {err}", source.display(), target.display()))
        })
    } else {
        // Non-atomic fallback: copy the bytes, then delete the source
        std::fs::copy(source, target)
            .and_then(|_| std::fs::remove_file(source))
            .map_err(|err| {
                OrganizeError::MoveFailed(format!(
                    "{} -> {}: {err}",
                    source.display(),
                    target.display()
                ))
            })
    };

    match moved {
        Ok(()) => {
            if let Some(backup_path) = backup {
                if let Err(err) = std::fs::remove_file(&backup_path) {
                    tracing::warn!("Could not delete backup {:?}: {}", backup_path, err);
                }
                rollback.remove(target);
            }
            Ok(())
        }
        Err(move_error) => {
            if let Some(backup_path) = backup {
                match std::fs::rename(&backup_path, target) {
                    Ok(()) => rollback.remove(target),
                    Err(restore_error) => {
                        // Entry stays for bulk rollback
                        tracing::error!(
                            "Could not restore {:?} from {:?}: {}",
                            target,
                            backup_path,
                            restore_error
                        );
                    }
                }
            }
            Err(move_error)
        }
    }
}

/// `<original_name>.backup.<YYYYMMDDTHHMMSS>` next to the displaced file
fn backup_path_for(target: &Path) -> PathBuf {
    let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%S");
    let file_name = target
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("displaced");
    target.with_file_name(format!("{file_name}.backup.{timestamp}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_name_follows_the_convention() {
        let backup = backup_path_for(Path::new("/out/X/01 - T.mp3"));
        let name = backup.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("01 - T.mp3.backup."));
        let suffix = name.rsplit('.').next().unwrap();
        assert_eq!(suffix.len(), 15);
        assert_eq!(&suffix[8..9], "T");
        assert_eq!(backup.parent(), Path::new("/out/X/01 - T.mp3").parent());
    }

    #[test]
    fn default_options_are_safe() {
        let options = RelocateOptions::default();
        assert!(options.create_parents);
        assert!(options.rollback_enabled);
        assert!(options.atomic_move);
        assert!(!options.replace_existing);
    }
}
