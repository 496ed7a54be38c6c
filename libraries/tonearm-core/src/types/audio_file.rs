/// Scanned audio file record
use crate::types::TrackMetadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One discovered audio file with its metadata and optional content digest
///
/// Built by the scan pipeline and immutable afterwards. The digest, when
/// present, is the lowercase SHA-256 hex of the file contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFile {
    /// Absolute path on disk
    pub path: PathBuf,

    /// Size in bytes at scan time
    pub size_bytes: u64,

    /// Last-modified timestamp at scan time
    pub modified: DateTime<Utc>,

    /// Extracted tag and header metadata
    pub metadata: TrackMetadata,

    /// Lowercase SHA-256 hex digest of the contents, when hashing succeeded
    pub content_hash: Option<String>,
}

impl AudioFile {
    /// Lowercased file extension, if any
    pub fn extension(&self) -> Option<String> {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
    }

    /// Filename without the extension
    pub fn file_stem(&self) -> Option<&str> {
        self.path.file_stem().and_then(|stem| stem.to_str())
    }

    /// Whether a non-empty content digest was computed
    pub fn has_digest(&self) -> bool {
        self.content_hash
            .as_deref()
            .is_some_and(|digest| !digest.is_empty())
    }
}

impl AudioFile {
    /// Build a record for a path with the given metadata
    pub fn new(path: impl Into<PathBuf>, size_bytes: u64, metadata: TrackMetadata) -> Self {
        Self {
            path: path.into(),
            size_bytes,
            modified: Utc::now(),
            metadata,
            content_hash: None,
        }
    }

    /// Attach a content digest
    pub fn with_hash(mut self, digest: impl Into<String>) -> Self {
        let digest = digest.into();
        self.content_hash = (!digest.is_empty()).then_some(digest);
        self
    }

    /// Attach a modification timestamp
    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = modified;
        self
    }
}

/// Convenience borrow of the path for map keys
impl AsRef<Path> for AudioFile {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased() {
        let file = AudioFile::new("/music/Song.MP3", 100, TrackMetadata::default());
        assert_eq!(file.extension().as_deref(), Some("mp3"));
        assert_eq!(file.file_stem(), Some("Song"));
    }

    #[test]
    fn empty_digest_is_never_stored() {
        let file = AudioFile::new("/music/song.flac", 100, TrackMetadata::default()).with_hash("");
        assert!(!file.has_digest());
        assert_eq!(file.content_hash, None);
    }

    #[test]
    fn digest_is_stored() {
        let file = AudioFile::new("/music/song.flac", 100, TrackMetadata::default())
            .with_hash("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
        assert!(file.has_digest());
    }
}
