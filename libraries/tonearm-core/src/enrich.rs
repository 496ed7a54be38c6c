//! External metadata enrichment seam
//!
//! The core never talks to the network itself. An enricher consumes a path
//! plus the currently known metadata and returns a (possibly) richer record
//! with the same field set. `enrich_collection` drives an enricher over a
//! whole collection under a concurrency cap, reporting progress under the
//! `"metadata_processing"` operation.

use crate::cancel::CancellationFlag;
use crate::error::Result;
use crate::progress::{operations, ObserverExt, SharedObserver};
use crate::types::TrackMetadata;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Opaque metadata enricher
///
/// Implementations may consult any external catalog; throttling and
/// timeouts are their concern, not the core's.
#[async_trait]
pub trait MetadataEnricher: Send + Sync {
    /// Return an enriched copy of `current` for the file at `path`
    async fn enrich(&self, path: &Path, current: TrackMetadata) -> Result<TrackMetadata>;
}

/// Enricher that returns its input unchanged
pub struct NoopEnricher;

#[async_trait]
impl MetadataEnricher for NoopEnricher {
    async fn enrich(&self, _path: &Path, current: TrackMetadata) -> Result<TrackMetadata> {
        Ok(current)
    }
}

/// Outcome of a batch enrichment run
#[derive(Debug, Default)]
pub struct EnrichOutcome {
    /// Records that were enriched (or passed through)
    pub enriched: HashMap<PathBuf, TrackMetadata>,

    /// Per-path failures; these never abort the batch
    pub failed: Vec<(PathBuf, String)>,
}

/// Run an enricher over a collection under a concurrency cap
///
/// Per-item failures are collected, never propagated. When the cancellation
/// flag is raised, unscheduled items are reported as failed with a
/// "cancelled" message and in-flight items complete normally.
pub async fn enrich_collection(
    enricher: Arc<dyn MetadataEnricher>,
    items: HashMap<PathBuf, TrackMetadata>,
    max_concurrent: usize,
    observer: Option<SharedObserver>,
    cancel: CancellationFlag,
) -> EnrichOutcome {
    let total = items.len() as u64;
    observer.report_start(operations::METADATA_PROCESSING, total);

    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let completed = Arc::new(AtomicU64::new(0));
    let mut handles = Vec::with_capacity(items.len());
    let mut outcome = EnrichOutcome::default();

    for (path, metadata) in items {
        if cancel.is_cancelled() {
            outcome.failed.push((path, "cancelled".to_string()));
            continue;
        }

        let enricher = enricher.clone();
        let semaphore = semaphore.clone();
        let observer = observer.clone();
        let completed = completed.clone();

        handles.push(tokio::spawn(async move {
            // Closed sender side means the coordinator is gone; treat as failure
            let Ok(_permit) = semaphore.acquire().await else {
                return (path, Err("worker pool closed".to_string()));
            };
            let result = enricher
                .enrich(&path, metadata)
                .await
                .map_err(|e| e.to_string());
            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
            observer.report_update(operations::METADATA_PROCESSING, done);
            (path, result)
        }));
    }

    for handle in handles {
        match handle.await {
            Ok((path, Ok(metadata))) => {
                outcome.enriched.insert(path, metadata);
            }
            Ok((path, Err(message))) => {
                tracing::warn!("Enrichment failed for {:?}: {}", path, message);
                outcome.failed.push((path, message));
            }
            Err(join_error) => {
                tracing::error!("Enrichment worker panicked: {}", join_error);
            }
        }
    }

    observer.report_complete(operations::METADATA_PROCESSING);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TonearmError;

    struct YearStamper;

    #[async_trait]
    impl MetadataEnricher for YearStamper {
        async fn enrich(&self, _path: &Path, current: TrackMetadata) -> Result<TrackMetadata> {
            Ok(current.to_builder().year(1999).build())
        }
    }

    struct AlwaysFails;

    #[async_trait]
    impl MetadataEnricher for AlwaysFails {
        async fn enrich(&self, path: &Path, _current: TrackMetadata) -> Result<TrackMetadata> {
            Err(TonearmError::enrichment(format!(
                "no match for {}",
                path.display()
            )))
        }
    }

    #[tokio::test]
    async fn noop_enricher_passes_through() {
        let mut items = HashMap::new();
        items.insert(
            PathBuf::from("/music/a.mp3"),
            TrackMetadata::builder().title("A").build(),
        );

        let outcome = enrich_collection(
            Arc::new(NoopEnricher),
            items,
            4,
            None,
            CancellationFlag::new(),
        )
        .await;

        assert_eq!(outcome.enriched.len(), 1);
        assert!(outcome.failed.is_empty());
        assert_eq!(
            outcome.enriched[&PathBuf::from("/music/a.mp3")]
                .title
                .as_deref(),
            Some("A")
        );
    }

    #[tokio::test]
    async fn enricher_results_are_collected() {
        let mut items = HashMap::new();
        for name in ["a", "b", "c"] {
            items.insert(
                PathBuf::from(format!("/music/{name}.mp3")),
                TrackMetadata::default(),
            );
        }

        let outcome = enrich_collection(
            Arc::new(YearStamper),
            items,
            2,
            None,
            CancellationFlag::new(),
        )
        .await;

        assert_eq!(outcome.enriched.len(), 3);
        assert!(outcome
            .enriched
            .values()
            .all(|metadata| metadata.year == Some(1999)));
    }

    #[tokio::test]
    async fn failures_never_abort_the_batch() {
        let mut items = HashMap::new();
        items.insert(PathBuf::from("/music/a.mp3"), TrackMetadata::default());
        items.insert(PathBuf::from("/music/b.mp3"), TrackMetadata::default());

        let outcome = enrich_collection(
            Arc::new(AlwaysFails),
            items,
            2,
            None,
            CancellationFlag::new(),
        )
        .await;

        assert!(outcome.enriched.is_empty());
        assert_eq!(outcome.failed.len(), 2);
    }

    #[tokio::test]
    async fn cancelled_batch_reports_unscheduled_items() {
        let mut items = HashMap::new();
        items.insert(PathBuf::from("/music/a.mp3"), TrackMetadata::default());

        let cancel = CancellationFlag::new();
        cancel.cancel();

        let outcome = enrich_collection(Arc::new(NoopEnricher), items, 2, None, cancel).await;

        assert!(outcome.enriched.is_empty());
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].1, "cancelled");
    }
}
