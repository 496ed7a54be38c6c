//! Per-file evaluation context
//!
//! Short-lived: borrows the metadata record and source path for the span of
//! one template evaluation.

use crate::template::TemplateVar;
use std::path::Path;
use tonearm_core::TrackMetadata;

/// Options applied during evaluation
#[derive(Debug, Clone)]
pub struct PatternOptions {
    /// Replacement for required text variables that are absent
    pub unknown_replacement: String,

    /// Per-segment length clamp in code points
    pub max_segment_length: usize,
}

impl Default for PatternOptions {
    fn default() -> Self {
        Self {
            unknown_replacement: "Unknown".to_string(),
            max_segment_length: crate::sanitize::MAX_SEGMENT_LENGTH,
        }
    }
}

/// Binding of a metadata record and source path for one evaluation
#[derive(Debug)]
pub struct PatternContext<'a> {
    /// Metadata record the variables read from
    pub metadata: &'a TrackMetadata,

    /// Source path, used for `ext` and `filename_stem`
    pub source_path: &'a Path,

    /// Evaluation options
    pub options: PatternOptions,
}

impl<'a> PatternContext<'a> {
    /// Create a context with default options
    pub fn new(metadata: &'a TrackMetadata, source_path: &'a Path) -> Self {
        Self {
            metadata,
            source_path,
            options: PatternOptions::default(),
        }
    }

    /// Create a context with explicit options
    pub fn with_options(
        metadata: &'a TrackMetadata,
        source_path: &'a Path,
        options: PatternOptions,
    ) -> Self {
        Self {
            metadata,
            source_path,
            options,
        }
    }

    /// Raw value of a variable; empty string when absent
    pub fn resolve(&self, var: TemplateVar) -> String {
        match var {
            TemplateVar::Artist => self.metadata.artist.clone().unwrap_or_default(),
            TemplateVar::AlbumArtist => self.metadata.album_artist.clone().unwrap_or_default(),
            TemplateVar::Album => self.metadata.album.clone().unwrap_or_default(),
            TemplateVar::Title => self.metadata.title.clone().unwrap_or_default(),
            TemplateVar::Genre => self.metadata.genre.clone().unwrap_or_default(),
            TemplateVar::Composer => self.metadata.composer.clone().unwrap_or_default(),
            TemplateVar::Year => self
                .metadata
                .year
                .map(|year| year.to_string())
                .unwrap_or_default(),
            TemplateVar::Year4 => self
                .metadata
                .year
                .map(|year| format!("{year:04}"))
                .unwrap_or_default(),
            TemplateVar::Track => self
                .metadata
                .track_number
                .map(|track| format!("{track:02}"))
                .unwrap_or_default(),
            TemplateVar::Disc => self
                .metadata
                .disc_number
                .map(|disc| disc.to_string())
                .unwrap_or_default(),
            TemplateVar::Format => self.metadata.format.clone().unwrap_or_default(),
            TemplateVar::Ext => self
                .source_path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(str::to_lowercase)
                .unwrap_or_default(),
            TemplateVar::FilenameStem => self
                .source_path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_string)
                .unwrap_or_default(),
        }
    }

    /// Built-in value for an absent variable with no usable fallback
    ///
    /// `track` pads to `"00"`, `year4` stays empty, `disc` defaults to the
    /// first disc; text variables use the unknown-field replacement.
    pub fn builtin_default(&self, var: TemplateVar) -> String {
        match var {
            TemplateVar::Track => "00".to_string(),
            TemplateVar::Year4 => String::new(),
            TemplateVar::Disc => "1".to_string(),
            TemplateVar::Ext => String::new(),
            _ => self.options.unknown_replacement.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_values_resolve_empty() {
        let metadata = TrackMetadata::default();
        let context = PatternContext::new(&metadata, Path::new("/music/demo.mp3"));

        assert_eq!(context.resolve(TemplateVar::Artist), "");
        assert_eq!(context.resolve(TemplateVar::Year4), "");
        assert_eq!(context.resolve(TemplateVar::Track), "");
    }

    #[test]
    fn path_derived_variables() {
        let metadata = TrackMetadata::default();
        let context = PatternContext::new(&metadata, Path::new("/music/My Song.FLAC"));

        assert_eq!(context.resolve(TemplateVar::Ext), "flac");
        assert_eq!(context.resolve(TemplateVar::FilenameStem), "My Song");
    }

    #[test]
    fn numeric_formatting() {
        let metadata = TrackMetadata::builder()
            .year(1976)
            .track_number(3)
            .disc_number(2)
            .build();
        let context = PatternContext::new(&metadata, Path::new("/music/x.mp3"));

        assert_eq!(context.resolve(TemplateVar::Year4), "1976");
        assert_eq!(context.resolve(TemplateVar::Track), "03");
        assert_eq!(context.resolve(TemplateVar::Disc), "2");
    }

    #[test]
    fn builtin_defaults() {
        let metadata = TrackMetadata::default();
        let context = PatternContext::new(&metadata, Path::new("/music/x.mp3"));

        assert_eq!(context.builtin_default(TemplateVar::Track), "00");
        assert_eq!(context.builtin_default(TemplateVar::Year4), "");
        assert_eq!(context.builtin_default(TemplateVar::Disc), "1");
        assert_eq!(context.builtin_default(TemplateVar::Artist), "Unknown");
    }
}
