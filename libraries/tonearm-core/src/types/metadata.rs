/// Track metadata record and its builder
use serde::{Deserialize, Serialize};

/// Accepted release year range
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=2030;

/// Accepted bitrate range in kbps
const BITRATE_RANGE: std::ops::RangeInclusive<u32> = 8..=2000;

/// Immutable tag and audio-header metadata for one file
///
/// Every field is optional: a missing tag is encoded as `None`, never as an
/// empty string or zero. Construct through [`TrackMetadata::builder`], which
/// enforces the range invariants (year 1900-2030, bitrate 8-2000 kbps,
/// track/disc numbers >= 1) by discarding out-of-range values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    /// Track title
    pub title: Option<String>,

    /// Artist name
    pub artist: Option<String>,

    /// Album title
    pub album: Option<String>,

    /// Album artist (may differ from track artist)
    pub album_artist: Option<String>,

    /// Composer
    pub composer: Option<String>,

    /// Primary genre
    pub genre: Option<String>,

    /// Release year
    pub year: Option<i32>,

    /// Track number within the disc
    pub track_number: Option<u32>,

    /// Declared total number of tracks
    pub total_tracks: Option<u32>,

    /// Disc number
    pub disc_number: Option<u32>,

    /// Duration in whole seconds, from the audio header
    pub duration_seconds: Option<u64>,

    /// Bitrate in kbps
    pub bitrate_kbps: Option<u32>,

    /// Sample rate in Hz
    pub sample_rate_hz: Option<u32>,

    /// Format label declared by the audio header
    pub format: Option<String>,

    /// Release date as written in the tag
    pub release_date: Option<String>,

    /// External catalog identifier (e.g. a MusicBrainz recording id)
    pub external_id: Option<String>,

    /// Embedded cover art bytes (not serialized)
    #[serde(skip)]
    pub cover_art: Option<Vec<u8>>,

    /// Free-form comment tag
    pub comment: Option<String>,
}

impl TrackMetadata {
    /// Start building a metadata record
    pub fn builder() -> TrackMetadataBuilder {
        TrackMetadataBuilder::default()
    }

    /// Rebuild this record through a builder, preserving every field
    pub fn to_builder(&self) -> TrackMetadataBuilder {
        TrackMetadataBuilder {
            record: self.clone(),
        }
    }

    /// Number of non-absent fields
    ///
    /// Used by the duplicate engine to pick a suggested keeper: the member
    /// carrying more metadata wins.
    pub fn filled_field_count(&self) -> usize {
        [
            self.title.is_some(),
            self.artist.is_some(),
            self.album.is_some(),
            self.album_artist.is_some(),
            self.composer.is_some(),
            self.genre.is_some(),
            self.year.is_some(),
            self.track_number.is_some(),
            self.total_tracks.is_some(),
            self.disc_number.is_some(),
            self.duration_seconds.is_some(),
            self.bitrate_kbps.is_some(),
            self.sample_rate_hz.is_some(),
            self.format.is_some(),
            self.release_date.is_some(),
            self.external_id.is_some(),
            self.cover_art.is_some(),
            self.comment.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }

    /// Check if metadata is mostly empty (no artist, album, or genre)
    pub fn is_sparse(&self) -> bool {
        self.artist.is_none() && self.album.is_none() && self.genre.is_none()
    }
}

/// Builder for [`TrackMetadata`]
///
/// Collects into a local record and freezes it on [`build`](Self::build).
/// String setters treat empty or whitespace-only input as absent; numeric
/// setters discard values outside their documented range.
#[derive(Debug, Clone, Default)]
pub struct TrackMetadataBuilder {
    record: TrackMetadata,
}

/// Turn an empty or whitespace-only string into `None`
fn non_blank(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

impl TrackMetadataBuilder {
    /// Set the track title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.record.title = non_blank(title);
        self
    }

    /// Set the artist
    pub fn artist(mut self, artist: impl Into<String>) -> Self {
        self.record.artist = non_blank(artist);
        self
    }

    /// Set the album
    pub fn album(mut self, album: impl Into<String>) -> Self {
        self.record.album = non_blank(album);
        self
    }

    /// Set the album artist
    pub fn album_artist(mut self, album_artist: impl Into<String>) -> Self {
        self.record.album_artist = non_blank(album_artist);
        self
    }

    /// Set the composer
    pub fn composer(mut self, composer: impl Into<String>) -> Self {
        self.record.composer = non_blank(composer);
        self
    }

    /// Set the primary genre
    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.record.genre = non_blank(genre);
        self
    }

    /// Set the release year; values outside 1900-2030 are discarded
    pub fn year(mut self, year: i32) -> Self {
        self.record.year = YEAR_RANGE.contains(&year).then_some(year);
        self
    }

    /// Set the track number; zero is discarded
    pub fn track_number(mut self, track: u32) -> Self {
        self.record.track_number = (track >= 1).then_some(track);
        self
    }

    /// Set the declared track total; zero is discarded
    pub fn total_tracks(mut self, total: u32) -> Self {
        self.record.total_tracks = (total >= 1).then_some(total);
        self
    }

    /// Set the disc number; zero is discarded
    pub fn disc_number(mut self, disc: u32) -> Self {
        self.record.disc_number = (disc >= 1).then_some(disc);
        self
    }

    /// Set the duration in whole seconds
    pub fn duration_seconds(mut self, seconds: u64) -> Self {
        self.record.duration_seconds = Some(seconds);
        self
    }

    /// Set the bitrate in kbps; values outside 8-2000 are discarded
    pub fn bitrate_kbps(mut self, kbps: u32) -> Self {
        self.record.bitrate_kbps = BITRATE_RANGE.contains(&kbps).then_some(kbps);
        self
    }

    /// Set the sample rate in Hz; zero is discarded
    pub fn sample_rate_hz(mut self, hz: u32) -> Self {
        self.record.sample_rate_hz = (hz > 0).then_some(hz);
        self
    }

    /// Set the header format label
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.record.format = non_blank(format);
        self
    }

    /// Set the raw release date string
    pub fn release_date(mut self, date: impl Into<String>) -> Self {
        self.record.release_date = non_blank(date);
        self
    }

    /// Set the external catalog identifier
    pub fn external_id(mut self, id: impl Into<String>) -> Self {
        self.record.external_id = non_blank(id);
        self
    }

    /// Set the embedded cover art bytes; empty art is discarded
    pub fn cover_art(mut self, art: Vec<u8>) -> Self {
        self.record.cover_art = (!art.is_empty()).then_some(art);
        self
    }

    /// Set the comment tag
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.record.comment = non_blank(comment);
        self
    }

    /// Freeze into an immutable record
    pub fn build(self) -> TrackMetadata {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_round_trips_all_fields() {
        let original = TrackMetadata::builder()
            .title("Hotel California")
            .artist("Eagles")
            .album("Hotel California")
            .album_artist("Eagles")
            .composer("Felder, Henley, Frey")
            .genre("Rock")
            .year(1976)
            .track_number(1)
            .total_tracks(9)
            .disc_number(1)
            .duration_seconds(391)
            .bitrate_kbps(320)
            .sample_rate_hz(44100)
            .format("FLAC")
            .release_date("1976-12-08")
            .external_id("mb-recording-id")
            .cover_art(vec![0xFF, 0xD8, 0xFF])
            .comment("remaster")
            .build();

        let rebuilt = original.to_builder().build();
        assert_eq!(original, rebuilt);
    }

    #[test]
    fn blank_strings_become_absent() {
        let metadata = TrackMetadata::builder()
            .title("")
            .artist("   ")
            .album("Actual Album")
            .build();

        assert_eq!(metadata.title, None);
        assert_eq!(metadata.artist, None);
        assert_eq!(metadata.album.as_deref(), Some("Actual Album"));
    }

    #[test]
    fn out_of_range_values_become_absent() {
        let metadata = TrackMetadata::builder()
            .year(1776)
            .bitrate_kbps(5000)
            .track_number(0)
            .disc_number(0)
            .build();

        assert_eq!(metadata.year, None);
        assert_eq!(metadata.bitrate_kbps, None);
        assert_eq!(metadata.track_number, None);
        assert_eq!(metadata.disc_number, None);
    }

    #[test]
    fn boundary_values_are_kept() {
        let metadata = TrackMetadata::builder()
            .year(1900)
            .bitrate_kbps(8)
            .track_number(1)
            .build();

        assert_eq!(metadata.year, Some(1900));
        assert_eq!(metadata.bitrate_kbps, Some(8));
        assert_eq!(metadata.track_number, Some(1));
    }

    #[test]
    fn filled_field_count() {
        let empty = TrackMetadata::default();
        assert_eq!(empty.filled_field_count(), 0);

        let partial = TrackMetadata::builder()
            .title("Song")
            .artist("Artist")
            .year(2001)
            .build();
        assert_eq!(partial.filled_field_count(), 3);
    }

    #[test]
    fn sparse_detection() {
        let sparse = TrackMetadata::builder().title("Only Title").build();
        assert!(sparse.is_sparse());

        let not_sparse = TrackMetadata::builder().artist("Someone").build();
        assert!(!not_sparse.is_sparse());
    }
}
