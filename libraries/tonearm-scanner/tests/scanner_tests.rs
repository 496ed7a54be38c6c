use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tonearm_core::{CancellationFlag, ProgressObserver};
use tonearm_scanner::{ScanConfig, ScanResult, Scanner};

/// Write a minimal valid PCM WAV file (mono, 16-bit, 8 kHz)
fn write_wav(path: &Path, seconds: u32) {
    let byte_rate: u32 = 8000 * 2;
    let data_len = byte_rate * seconds;

    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&8000u32.to_le_bytes());
    bytes.extend_from_slice(&byte_rate.to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.resize(44 + data_len as usize, 0);

    fs::write(path, bytes).unwrap();
}

#[tokio::test]
async fn empty_root_scans_to_success_with_zero_files() {
    let temp = TempDir::new().unwrap();

    let result = Scanner::default().scan(temp.path()).await;

    match result {
        ScanResult::Success { files, stats, .. } => {
            assert!(files.is_empty());
            assert_eq!(stats.total_bytes, 0);
        }
        other => panic!("expected Success, got {other:?}"),
    }
}

#[tokio::test]
async fn mixed_tree_is_walked_recursively() {
    let temp = TempDir::new().unwrap();
    write_wav(&temp.path().join("one.wav"), 1);
    write_wav(&temp.path().join("two.wav"), 1);
    fs::write(temp.path().join("notes.txt"), b"not audio").unwrap();

    let nested = temp.path().join("album");
    fs::create_dir(&nested).unwrap();
    write_wav(&nested.join("three.wav"), 1);

    let result = Scanner::default().scan(temp.path()).await;

    match result {
        ScanResult::Success { files, stats, .. } => {
            assert_eq!(files.len(), 3);
            assert_eq!(stats.extension_counts.get("wav"), Some(&3));
            assert!(stats.total_bytes > 0);
            assert!(files.iter().all(tonearm_core::AudioFile::has_digest));
            assert!(stats.phase_timings.contains_key("directory_walk"));
            assert!(stats.phase_timings.contains_key("file_processing"));
        }
        other => panic!("expected Success, got {other:?}"),
    }
}

#[tokio::test]
async fn shallow_scan_skips_subdirectories() {
    let temp = TempDir::new().unwrap();
    write_wav(&temp.path().join("top.wav"), 1);
    let nested = temp.path().join("deep");
    fs::create_dir(&nested).unwrap();
    write_wav(&nested.join("below.wav"), 1);

    let config = ScanConfig {
        deep_scan: false,
        ..ScanConfig::default()
    };
    let result = Scanner::new(config).scan(temp.path()).await;

    assert_eq!(result.files().len(), 1);
}

#[tokio::test]
async fn digest_can_be_disabled() {
    let temp = TempDir::new().unwrap();
    write_wav(&temp.path().join("one.wav"), 1);

    let config = ScanConfig {
        compute_digest: false,
        ..ScanConfig::default()
    };
    let result = Scanner::new(config).scan(temp.path()).await;

    assert_eq!(result.files().len(), 1);
    assert!(result.files().iter().all(|f| f.content_hash.is_none()));
}

#[tokio::test]
async fn unparseable_file_yields_partial() {
    let temp = TempDir::new().unwrap();
    write_wav(&temp.path().join("good.wav"), 1);
    fs::write(temp.path().join("bad.mp3"), b"not actually an mp3").unwrap();

    let result = Scanner::default().scan(temp.path()).await;

    match &result {
        ScanResult::Partial { files, failed, .. } => {
            assert_eq!(files.len(), 1);
            assert_eq!(failed.len(), 1);
            assert!(failed[0].path.ends_with("bad.mp3"));
        }
        other => panic!("expected Partial, got {other:?}"),
    }
    assert_eq!(result.success_rate(), 0.5);
}

#[tokio::test]
async fn all_failures_yield_failure_variant() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("bad1.mp3"), b"garbage").unwrap();
    fs::write(temp.path().join("bad2.flac"), b"garbage").unwrap();

    let result = Scanner::default().scan(temp.path()).await;

    match result {
        ScanResult::Failure { failed, .. } => assert_eq!(failed.len(), 2),
        other => panic!("expected Failure, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_root_fails_with_kind_bearing_message() {
    let result = Scanner::default()
        .scan(Path::new("/nonexistent/music/root"))
        .await;

    match result {
        ScanResult::Failure { message, .. } => assert!(message.contains("does not exist")),
        other => panic!("expected Failure, got {other:?}"),
    }
}

#[tokio::test]
async fn file_root_fails_with_kind_bearing_message() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("single.wav");
    write_wav(&file, 1);

    let result = Scanner::default().scan(&file).await;

    match result {
        ScanResult::Failure { message, .. } => assert!(message.contains("not a directory")),
        other => panic!("expected Failure, got {other:?}"),
    }
}

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<(String, u64)>>,
}

impl ProgressObserver for RecordingObserver {
    fn start(&self, operation: &str, total: u64) {
        self.events
            .lock()
            .unwrap()
            .push((format!("start:{operation}"), total));
    }

    fn update(&self, operation: &str, completed: u64) {
        self.events
            .lock()
            .unwrap()
            .push((format!("update:{operation}"), completed));
    }

    fn complete(&self, operation: &str) {
        self.events
            .lock()
            .unwrap()
            .push((format!("complete:{operation}"), 0));
    }
}

#[tokio::test]
async fn progress_is_reported_under_file_scan() {
    let temp = TempDir::new().unwrap();
    write_wav(&temp.path().join("a.wav"), 1);
    write_wav(&temp.path().join("b.wav"), 1);

    let observer = Arc::new(RecordingObserver::default());
    let result = Scanner::default()
        .with_observer(observer.clone())
        .scan(temp.path())
        .await;
    assert!(result.is_success());

    let events = observer.events.lock().unwrap();
    assert_eq!(events.first(), Some(&("start:file_scan".to_string(), 2)));
    assert_eq!(events.last(), Some(&("complete:file_scan".to_string(), 0)));

    // Completed counts are monotonically non-decreasing
    let updates: Vec<u64> = events
        .iter()
        .filter(|(name, _)| name == "update:file_scan")
        .map(|(_, completed)| *completed)
        .collect();
    assert_eq!(updates.len(), 2);
    assert!(updates.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[tokio::test]
async fn explicit_file_list_is_scanned_without_a_walk() {
    let temp = TempDir::new().unwrap();
    let good = temp.path().join("keep.wav");
    write_wav(&good, 1);
    let unsupported = temp.path().join("notes.txt");
    fs::write(&unsupported, b"text").unwrap();
    let missing = temp.path().join("ghost.wav");

    let paths = vec![good.clone(), unsupported, missing];
    let result = Scanner::default().scan_files(&paths).await;

    match result {
        ScanResult::Partial { files, failed, .. } => {
            assert_eq!(files.len(), 1);
            assert!(files[0].path.ends_with("keep.wav"));
            assert_eq!(failed.len(), 2);
        }
        other => panic!("expected Partial, got {other:?}"),
    }
}

#[tokio::test]
async fn cancelled_scan_records_unscheduled_files() {
    let temp = TempDir::new().unwrap();
    write_wav(&temp.path().join("a.wav"), 1);
    write_wav(&temp.path().join("b.wav"), 1);

    let cancel = CancellationFlag::new();
    cancel.cancel();

    let result = Scanner::default()
        .with_cancellation(cancel)
        .scan(temp.path())
        .await;

    assert!(result.files().is_empty());
    assert_eq!(result.failures().len(), 2);
    assert!(result
        .failures()
        .iter()
        .all(|failure| failure.message == "cancelled"));
}
