//! Validation pass over a scanned collection

use crate::report::{
    AlbumCompleteness, IssueKind, Severity, ValidationIssue, ValidationReport,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::time::Instant;
use tonearm_core::progress::{operations, ObserverExt};
use tonearm_core::{AudioFile, SharedObserver};

/// Embedded cover art below this size is flagged as low resolution
const MIN_COVER_ART_BYTES: usize = 10 * 1024;

/// Sidecar image names that count as album cover art
const COVER_ART_NAMES: &[&str] = &[
    "cover.jpg",
    "cover.png",
    "folder.jpg",
    "folder.png",
    "albumart.jpg",
    "albumart.png",
    "front.jpg",
    "front.png",
];

/// Validator configuration, carried by value into each call
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Verify each file is still readable on disk
    pub check_integrity: bool,

    /// Check tag completeness
    pub validate_metadata: bool,

    /// Escalate missing title/artist/album from Warning to Error
    pub strict_metadata: bool,

    /// Build album completeness records and flag gaps
    pub detect_incomplete_albums: bool,

    /// Flag files sharing a content digest
    pub find_duplicates: bool,

    /// Check for embedded or sidecar cover art
    pub validate_cover_art: bool,

    /// Extensions considered valid for the collection
    pub supported_formats: Vec<String>,

    /// Files below this bitrate are flagged as low quality
    pub min_bitrate_kbps: u32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            check_integrity: true,
            validate_metadata: true,
            strict_metadata: false,
            detect_incomplete_albums: true,
            find_duplicates: true,
            validate_cover_art: true,
            supported_formats: ["mp3", "flac", "m4a", "mp4", "ogg", "wav"]
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
            min_bitrate_kbps: 128,
        }
    }
}

/// Collection validator
pub struct Validator {
    config: ValidationConfig,
    observer: Option<SharedObserver>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

impl Validator {
    /// Create a validator with the given configuration
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            config,
            observer: None,
        }
    }

    /// Attach a progress observer
    pub fn with_observer(mut self, observer: SharedObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Validate a scanned collection
    pub fn validate(&self, files: &[AudioFile]) -> ValidationReport {
        let clock = Instant::now();
        let mut report = ValidationReport {
            files_checked: files.len(),
            ..ValidationReport::default()
        };

        self.observer
            .report_start(operations::COLLECTION_VALIDATION, files.len() as u64);

        for (index, file) in files.iter().enumerate() {
            if self.config.validate_metadata {
                self.check_metadata(file, &mut report.issues);
            }
            if self.config.check_integrity {
                check_integrity(file, &mut report.issues);
            }
            if self.config.validate_cover_art {
                check_cover_art(file, &mut report.issues);
            }
            self.observer
                .report_update(operations::COLLECTION_VALIDATION, index as u64 + 1);
        }

        if self.config.find_duplicates {
            check_duplicates(files, &mut report.issues);
        }
        if self.config.detect_incomplete_albums {
            let albums = build_album_records(files);
            flag_album_issues(&albums, files, &mut report.issues);
            report.albums = albums;
        }

        self.observer
            .report_complete(operations::COLLECTION_VALIDATION);

        report.duration = clock.elapsed();
        tracing::debug!(
            "Validated {} files: {} issues, {} albums",
            files.len(),
            report.issues.len(),
            report.albums.len()
        );
        report
    }

    /// Tag completeness and quality checks for one file
    fn check_metadata(&self, file: &AudioFile, issues: &mut Vec<ValidationIssue>) {
        let core_severity = if self.config.strict_metadata {
            Severity::Error
        } else {
            Severity::Warning
        };

        let core_fields = [
            ("title", file.metadata.title.is_none()),
            ("artist", file.metadata.artist.is_none()),
            ("album", file.metadata.album.is_none()),
        ];
        for (field, missing) in core_fields {
            if missing {
                issues.push(ValidationIssue {
                    kind: IssueKind::MissingMetadata,
                    severity: core_severity,
                    path: file.path.clone(),
                    message: format!("Missing {field} tag"),
                    remediation: Some(format!("Tag the file with a {field}")),
                });
            }
        }

        let optional_fields = [
            ("track number", file.metadata.track_number.is_none()),
            ("year", file.metadata.year.is_none()),
            ("genre", file.metadata.genre.is_none()),
        ];
        for (field, missing) in optional_fields {
            if missing {
                issues.push(ValidationIssue {
                    kind: IssueKind::MissingMetadata,
                    severity: Severity::Info,
                    path: file.path.clone(),
                    message: format!("Missing {field} tag"),
                    remediation: None,
                });
            }
        }

        if let Some(bitrate) = file.metadata.bitrate_kbps {
            if bitrate < self.config.min_bitrate_kbps {
                issues.push(ValidationIssue {
                    kind: IssueKind::LowQualityAudio,
                    severity: Severity::Warning,
                    path: file.path.clone(),
                    message: format!(
                        "Bitrate {bitrate} kbps is below the minimum of {} kbps",
                        self.config.min_bitrate_kbps
                    ),
                    remediation: Some("Replace with a higher-quality rip".to_string()),
                });
            }
        }

        let supported = file
            .extension()
            .is_some_and(|ext| self.config.supported_formats.contains(&ext));
        if !supported {
            issues.push(ValidationIssue {
                kind: IssueKind::InvalidFilename,
                severity: Severity::Warning,
                path: file.path.clone(),
                message: "Unsupported file extension".to_string(),
                remediation: None,
            });
        }

        if let Some(name) = file.path.file_name().and_then(|name| name.to_str()) {
            if has_unportable_characters(name) {
                issues.push(ValidationIssue {
                    kind: IssueKind::InvalidFilename,
                    severity: Severity::Info,
                    path: file.path.clone(),
                    message: "Filename contains characters invalid on some filesystems"
                        .to_string(),
                    remediation: Some("Organize the collection to rename it".to_string()),
                });
            }
        }
    }
}

/// Characters a Unix filename may carry that Windows filesystems reject
fn has_unportable_characters(name: &str) -> bool {
    name.chars()
        .any(|c| matches!(c, '<' | '>' | ':' | '"' | '\\' | '|' | '?' | '*') || c.is_control())
}

/// Flag files that are gone or unreadable
fn check_integrity(file: &AudioFile, issues: &mut Vec<ValidationIssue>) {
    if !file.path.exists() {
        issues.push(ValidationIssue {
            kind: IssueKind::CorruptFile,
            severity: Severity::Critical,
            path: file.path.clone(),
            message: "File no longer exists".to_string(),
            remediation: Some("Rescan the collection".to_string()),
        });
        return;
    }
    if let Err(err) = std::fs::File::open(&file.path) {
        issues.push(ValidationIssue {
            kind: IssueKind::CorruptFile,
            severity: Severity::Error,
            path: file.path.clone(),
            message: format!("File is not readable: {err}"),
            remediation: None,
        });
    }
}

/// Flag absent or low-resolution cover art
fn check_cover_art(file: &AudioFile, issues: &mut Vec<ValidationIssue>) {
    if let Some(art) = &file.metadata.cover_art {
        if art.len() < MIN_COVER_ART_BYTES {
            issues.push(ValidationIssue {
                kind: IssueKind::MissingCoverArt,
                severity: Severity::Info,
                path: file.path.clone(),
                message: "Embedded cover art is low resolution".to_string(),
                remediation: Some("Embed a larger image".to_string()),
            });
        }
        return;
    }

    if directory_has_cover_art(file.path.parent()) {
        return;
    }

    issues.push(ValidationIssue {
        kind: IssueKind::MissingCoverArt,
        severity: Severity::Warning,
        path: file.path.clone(),
        message: "No embedded or sidecar cover art".to_string(),
        remediation: Some("Add a cover.jpg next to the album".to_string()),
    });
}

/// Whether the album directory carries a recognized sidecar image
fn directory_has_cover_art(dir: Option<&Path>) -> bool {
    let Some(dir) = dir else {
        return false;
    };
    COVER_ART_NAMES.iter().any(|name| dir.join(name).is_file())
}

/// Flag files sharing a content digest
fn check_duplicates(files: &[AudioFile], issues: &mut Vec<ValidationIssue>) {
    let mut by_digest: HashMap<&str, Vec<&AudioFile>> = HashMap::new();
    for file in files {
        if let Some(digest) = file.content_hash.as_deref() {
            if !digest.is_empty() {
                by_digest.entry(digest).or_default().push(file);
            }
        }
    }

    for members in by_digest.into_values() {
        if members.len() < 2 {
            continue;
        }
        // Every copy beyond the first is redundant
        for file in &members[1..] {
            issues.push(ValidationIssue {
                kind: IssueKind::DuplicateFile,
                severity: Severity::Warning,
                path: file.path.clone(),
                message: format!(
                    "Identical content also exists at {}",
                    members[0].path.display()
                ),
                remediation: Some("Remove one of the copies".to_string()),
            });
        }
    }
}

/// Build completeness records for every (artist, album) pair
fn build_album_records(files: &[AudioFile]) -> Vec<AlbumCompleteness> {
    let mut groups: BTreeMap<(String, String), Vec<&AudioFile>> = BTreeMap::new();
    for file in files {
        if let (Some(artist), Some(album)) = (&file.metadata.artist, &file.metadata.album) {
            groups
                .entry((artist.clone(), album.clone()))
                .or_default()
                .push(file);
        }
    }

    groups
        .into_iter()
        .map(|((artist, album), members)| {
            let present_tracks: BTreeSet<u32> = members
                .iter()
                .filter_map(|file| file.metadata.track_number)
                .collect();
            let declared_total = members
                .iter()
                .filter_map(|file| file.metadata.total_tracks)
                .max();
            let expected_total = declared_total
                .or_else(|| present_tracks.iter().max().copied())
                .unwrap_or(0);
            let missing_tracks: Vec<u32> = (1..=expected_total)
                .filter(|track| !present_tracks.contains(track))
                .collect();
            let complete = missing_tracks.is_empty() && !present_tracks.is_empty();

            AlbumCompleteness {
                artist,
                album,
                expected_total,
                present_tracks,
                missing_tracks,
                complete,
            }
        })
        .collect()
}

/// Emit incomplete-album and inconsistency issues per (artist, album)
///
/// One aggregate `IncompleteAlbum` issue is emitted per album, anchored to
/// the first affected file.
fn flag_album_issues(
    albums: &[AlbumCompleteness],
    files: &[AudioFile],
    issues: &mut Vec<ValidationIssue>,
) {
    for record in albums {
        let members: Vec<&AudioFile> = files
            .iter()
            .filter(|file| {
                file.metadata.artist.as_deref() == Some(record.artist.as_str())
                    && file.metadata.album.as_deref() == Some(record.album.as_str())
            })
            .collect();
        let Some(anchor) = members.first() else {
            continue;
        };

        if !record.complete && !record.missing_tracks.is_empty() {
            let missing: Vec<String> = record
                .missing_tracks
                .iter()
                .map(u32::to_string)
                .collect();
            issues.push(ValidationIssue {
                kind: IssueKind::IncompleteAlbum,
                severity: Severity::Warning,
                path: anchor.path.clone(),
                message: format!(
                    "Album \"{}\" by {} is missing track(s) {}",
                    record.album,
                    record.artist,
                    missing.join(", ")
                ),
                remediation: Some("Locate the missing tracks".to_string()),
            });
        }

        let distinct_years: BTreeSet<i32> = members
            .iter()
            .filter_map(|file| file.metadata.year)
            .collect();
        let distinct_totals: BTreeSet<u32> = members
            .iter()
            .filter_map(|file| file.metadata.total_tracks)
            .collect();
        if distinct_years.len() > 1 || distinct_totals.len() > 1 {
            issues.push(ValidationIssue {
                kind: IssueKind::InconsistentMetadata,
                severity: Severity::Warning,
                path: anchor.path.clone(),
                message: format!(
                    "Album \"{}\" by {} has conflicting year or track-total tags",
                    record.album, record.artist
                ),
                remediation: Some("Align the tags across the album".to_string()),
            });
        }
    }
}
