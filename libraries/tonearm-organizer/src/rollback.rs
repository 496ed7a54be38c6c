//! Session rollback table
//!
//! Maps a displaced target to the timestamped backup holding its previous
//! bytes. Entries are inserted before a move attempt, removed on commit or
//! successful per-file restore, and drained by bulk rollback. The map is
//! guarded by a mutex; only the relocator writes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Outcome of a bulk rollback
#[derive(Debug, Default, Clone)]
pub struct RollbackReport {
    /// Entries whose backup was moved back over its target
    pub restored: usize,

    /// Entries that could not be restored
    pub failed: Vec<(PathBuf, String)>,
}

/// Shared rollback table for one relocation session
#[derive(Debug, Clone, Default)]
pub(crate) struct RollbackTable {
    entries: Arc<Mutex<HashMap<PathBuf, PathBuf>>>,
}

impl RollbackTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Lock the table, recovering from a poisoned mutex
    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, PathBuf>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a displaced target and its backup location
    pub(crate) fn insert(&self, target: PathBuf, backup: PathBuf) {
        self.lock().insert(target, backup);
    }

    /// Drop the entry for a committed or restored target
    pub(crate) fn remove(&self, target: &Path) {
        self.lock().remove(target);
    }

    /// Number of uncommitted entries
    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    /// Move every backup over its target; the table is cleared regardless
    ///
    /// Per-entry failures are reported and do not stop iteration.
    pub(crate) fn drain_and_restore(&self) -> RollbackReport {
        let drained: Vec<(PathBuf, PathBuf)> = self.lock().drain().collect();

        let mut report = RollbackReport::default();
        for (target, backup) in drained {
            match std::fs::rename(&backup, &target) {
                Ok(()) => {
                    tracing::info!("Restored {:?} from {:?}", target, backup);
                    report.restored += 1;
                }
                Err(err) => {
                    tracing::warn!("Could not restore {:?} from {:?}: {}", target, backup, err);
                    report.failed.push((target, err.to_string()));
                }
            }
        }
        report
    }
}
