//! The three duplicate detectors
//!
//! Each detector consumes the borrowed file list and emits unfiltered
//! groups; the analyzer applies the cross-detector priority afterwards.

use crate::report::{DuplicateGroup, DuplicateKind};
use std::collections::BTreeMap;
use tonearm_core::AudioFile;

/// Number of fields in the similarity vector
const SIGNATURE_FIELDS: usize = 5;

/// Normalize a tag value for comparison: lowercase, trim, collapse runs of
/// whitespace
pub fn normalize_field(value: &str) -> String {
    value
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The five-field comparison vector of one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Signature {
    fields: [Option<String>; SIGNATURE_FIELDS],
}

impl Signature {
    pub(crate) fn of(file: &AudioFile) -> Self {
        let metadata = &file.metadata;
        Self {
            fields: [
                metadata.title.as_deref().map(normalize_field),
                metadata.artist.as_deref().map(normalize_field),
                metadata.album.as_deref().map(normalize_field),
                metadata.year.map(|year| year.to_string()),
                metadata.track_number.map(|track| track.to_string()),
            ],
        }
    }

    /// Matching non-absent fields divided by the vector length
    pub(crate) fn score(&self, other: &Self) -> f64 {
        let matching = self
            .fields
            .iter()
            .zip(&other.fields)
            .filter(|(a, b)| match (a, b) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            })
            .count();
        matching as f64 / SIGNATURE_FIELDS as f64
    }

    /// Stable group key for a cluster representative
    pub(crate) fn key(&self) -> String {
        self.fields
            .iter()
            .map(|field| field.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Whether every field is absent (such a file can never match)
    pub(crate) fn is_empty(&self) -> bool {
        self.fields.iter().all(Option::is_none)
    }
}

/// Group files with identical non-empty digests
pub(crate) fn detect_exact_content(files: &[AudioFile]) -> Vec<DuplicateGroup> {
    let mut by_digest: BTreeMap<&str, Vec<&AudioFile>> = BTreeMap::new();
    for file in files {
        if let Some(digest) = file.content_hash.as_deref() {
            if !digest.is_empty() {
                by_digest.entry(digest).or_default().push(file);
            }
        }
    }

    by_digest
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(digest, members)| {
            let unit_size = members[0].size_bytes;
            DuplicateGroup {
                kind: DuplicateKind::ExactContent,
                key: digest.to_string(),
                unit_size_bytes: unit_size,
                members: members.iter().map(|file| file.path.clone()).collect(),
                wasted_bytes: unit_size * (members.len() as u64 - 1),
                suggested_keeper: None,
            }
        })
        .collect()
}

/// Cluster files whose pairwise similarity reaches the threshold
pub(crate) fn detect_metadata_matches(
    files: &[AudioFile],
    threshold: f64,
) -> Vec<DuplicateGroup> {
    // Files with a fully absent vector can never reach any threshold > 0
    let candidates: Vec<(usize, Signature)> = files
        .iter()
        .enumerate()
        .map(|(index, file)| (index, Signature::of(file)))
        .filter(|(_, signature)| !signature.is_empty())
        .collect();

    let mut clusters = UnionFind::new(candidates.len());
    for i in 0..candidates.len() {
        for j in (i + 1)..candidates.len() {
            if candidates[i].1.score(&candidates[j].1) >= threshold {
                clusters.union(i, j);
            }
        }
    }

    let mut by_root: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for slot in 0..candidates.len() {
        by_root.entry(clusters.find(slot)).or_default().push(slot);
    }

    by_root
        .into_values()
        .filter(|slots| slots.len() >= 2)
        .map(|slots| {
            let representative = &candidates[slots[0]];
            let files_of_cluster: Vec<&AudioFile> = slots
                .iter()
                .map(|slot| &files[candidates[*slot].0])
                .collect();
            DuplicateGroup {
                kind: DuplicateKind::MetadataMatch,
                key: representative.1.key(),
                unit_size_bytes: files_of_cluster[0].size_bytes,
                members: files_of_cluster
                    .iter()
                    .map(|file| file.path.clone())
                    .collect(),
                wasted_bytes: 0,
                suggested_keeper: None,
            }
        })
        .collect()
}

/// Group large files sharing an exact byte size
pub(crate) fn detect_size_buckets(
    files: &[AudioFile],
    size_threshold_bytes: u64,
) -> Vec<DuplicateGroup> {
    let mut by_size: BTreeMap<u64, Vec<&AudioFile>> = BTreeMap::new();
    for file in files {
        if file.size_bytes >= size_threshold_bytes {
            by_size.entry(file.size_bytes).or_default().push(file);
        }
    }

    by_size
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(size, members)| DuplicateGroup {
            kind: DuplicateKind::SizeBucket,
            key: format!("size:{size}"),
            unit_size_bytes: size,
            members: members.iter().map(|file| file.path.clone()).collect(),
            wasted_bytes: 0,
            suggested_keeper: None,
        })
        .collect()
}

/// Union-find over candidate slots for metadata clustering
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, slot: usize) -> usize {
        if self.parent[slot] != slot {
            let root = self.find(self.parent[slot]);
            self.parent[slot] = root;
        }
        self.parent[slot]
    }

    fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            self.parent[root_b.max(root_a)] = root_b.min(root_a);
        }
    }
}
