//! Metadata extraction from audio files
//!
//! Tag fields are read by logical key, not by container format. Missing or
//! malformed fields become absent, never zero or an empty string.

use crate::MetadataError;
use lofty::{Accessor, AudioFile, FileType, ItemKey, Probe, TaggedFileExt};
use std::path::Path;
use tonearm_core::TrackMetadata;

/// Extract an immutable metadata record from an audio file
pub fn extract_metadata(path: &Path) -> crate::Result<TrackMetadata> {
    if !path.exists() {
        return Err(MetadataError::FileNotFound(path.display().to_string()));
    }

    let tagged_file = Probe::open(path)
        .map_err(|e| MetadataError::ExtractionFailed(format!("Failed to open file: {e}")))?
        .read()
        .map_err(|e| MetadataError::ExtractionFailed(format!("Failed to read file: {e}")))?;

    // Audio header properties
    let properties = tagged_file.properties();
    let duration_seconds = properties.duration().as_secs();
    let bitrate = properties.audio_bitrate();
    let sample_rate = properties.sample_rate();
    let format = format_label(tagged_file.file_type(), path);

    let mut builder = TrackMetadata::builder()
        .duration_seconds(duration_seconds)
        .format(format);

    if let Some(kbps) = bitrate {
        builder = builder.bitrate_kbps(kbps);
    }
    if let Some(hz) = sample_rate {
        builder = builder.sample_rate_hz(hz);
    }

    // Prefer the primary tag (ID3v2 for MP3, Vorbis comments for OGG/FLAC)
    if let Some(tag) = tagged_file.primary_tag().or(tagged_file.first_tag()) {
        if let Some(title) = tag.title() {
            builder = builder.title(title.to_string());
        }
        if let Some(artist) = tag.artist() {
            builder = builder.artist(artist.to_string());
        }
        if let Some(album) = tag.album() {
            builder = builder.album(album.to_string());
        }
        if let Some(album_artist) = tag.get_string(&ItemKey::AlbumArtist) {
            builder = builder.album_artist(album_artist.to_string());
        }
        if let Some(composer) = tag.get_string(&ItemKey::Composer) {
            builder = builder.composer(composer.to_string());
        }
        if let Some(genre) = tag.genre() {
            // Multi-valued genre tags: keep the primary entry
            if let Some(primary) = genre
                .split(&[',', ';', '/'][..])
                .map(str::trim)
                .find(|entry| !entry.is_empty())
            {
                builder = builder.genre(primary.to_string());
            }
        }

        // Track field may be stored as a "N/M" pair in a single text frame
        let (track, total) = match tag.get_string(&ItemKey::TrackNumber) {
            Some(raw) if raw.contains('/') => parse_track_pair(raw),
            _ => (tag.track(), tag.track_total()),
        };
        if let Some(track) = track {
            builder = builder.track_number(track);
        }
        if let Some(total) = total {
            builder = builder.total_tracks(total);
        }
        if let Some(disc) = tag.disk() {
            builder = builder.disc_number(disc);
        }

        let release_date = tag
            .get_string(&ItemKey::RecordingDate)
            .or_else(|| tag.get_string(&ItemKey::OriginalReleaseDate))
            .map(str::to_string);
        if let Some(date) = &release_date {
            builder = builder.release_date(date.clone());
        }

        if let Some(year) = tag.year() {
            builder = builder.year(year as i32);
        } else if let Some(year) = release_date.as_deref().and_then(leading_year) {
            builder = builder.year(year);
        }

        if let Some(id) = tag.get_string(&ItemKey::MusicBrainzRecordingId) {
            builder = builder.external_id(id.to_string());
        }
        if let Some(comment) = tag.comment() {
            builder = builder.comment(comment.to_string());
        }
        if let Some(picture) = tag.pictures().first() {
            builder = builder.cover_art(picture.data().to_vec());
        }
    }

    Ok(builder.build())
}

/// Parse a `"N/M"` track frame into (track, total)
///
/// Malformed numeric parts yield absent, never zero.
pub fn parse_track_pair(raw: &str) -> (Option<u32>, Option<u32>) {
    let mut parts = raw.splitn(2, '/');
    let track = parts
        .next()
        .and_then(|part| part.trim().parse::<u32>().ok())
        .filter(|n| *n >= 1);
    let total = parts
        .next()
        .and_then(|part| part.trim().parse::<u32>().ok())
        .filter(|n| *n >= 1);
    (track, total)
}

/// Four-digit year prefix of a date string, e.g. `"1976-12-08"` -> 1976
fn leading_year(date: &str) -> Option<i32> {
    let digits: String = date.chars().take_while(char::is_ascii_digit).collect();
    if digits.len() == 4 {
        digits.parse().ok()
    } else {
        None
    }
}

/// Header-declared format label
fn format_label(file_type: FileType, path: &Path) -> String {
    match file_type {
        FileType::Mpeg => "MP3".to_string(),
        FileType::Flac => "FLAC".to_string(),
        FileType::Mp4 => "MPEG-4".to_string(),
        FileType::Opus => "Opus".to_string(),
        FileType::Vorbis => "Vorbis".to_string(),
        FileType::Wav => "WAV".to_string(),
        FileType::Aiff => "AIFF".to_string(),
        FileType::Ape => "APE".to_string(),
        _ => path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_uppercase)
            .unwrap_or_else(|| "UNKNOWN".to_string()),
    }
}
