//! Progress bus: a passive observer the bulk engines report into
//!
//! Producers hold an `Option<SharedObserver>` and must tolerate `None`.
//! Implementations are called from worker tasks and must not block.

use std::sync::Arc;

/// Operation names the engines report under
pub mod operations {
    /// Scanner pipeline
    pub const FILE_SCAN: &str = "file_scan";

    /// Relocator target-generation pre-pass
    pub const PATTERN_ORGANIZATION: &str = "pattern_organization";

    /// Relocator move phase
    pub const FILE_ORGANIZATION: &str = "file_organization";

    /// Validator pass
    pub const COLLECTION_VALIDATION: &str = "collection_validation";

    /// Batch metadata enrichment
    pub const METADATA_PROCESSING: &str = "metadata_processing";
}

/// Observer interface for long-running operations
///
/// `update` receives a monotonically non-decreasing completed count against
/// the total announced by `start`. All three calls must be cheap and
/// thread-safe; they are invoked from concurrent worker tasks.
pub trait ProgressObserver: Send + Sync {
    /// An operation with a known total amount of work is starting
    fn start(&self, operation: &str, total: u64);

    /// `completed` units of the operation are done
    fn update(&self, operation: &str, completed: u64);

    /// The operation has finished
    fn complete(&self, operation: &str);
}

/// Shared handle to an observer
pub type SharedObserver = Arc<dyn ProgressObserver>;

/// Observer helpers shared by the engines
pub trait ObserverExt {
    /// Report a start if an observer is attached
    fn report_start(&self, operation: &str, total: u64);

    /// Report an update if an observer is attached
    fn report_update(&self, operation: &str, completed: u64);

    /// Report completion if an observer is attached
    fn report_complete(&self, operation: &str);
}

impl ObserverExt for Option<SharedObserver> {
    fn report_start(&self, operation: &str, total: u64) {
        if let Some(observer) = self {
            observer.start(operation, total);
        }
    }

    fn report_update(&self, operation: &str, completed: u64) {
        if let Some(observer) = self {
            observer.update(operation, completed);
        }
    }

    fn report_complete(&self, operation: &str) {
        if let Some(observer) = self {
            observer.complete(operation);
        }
    }
}
