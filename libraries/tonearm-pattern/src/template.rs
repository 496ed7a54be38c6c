//! Template parsing and evaluation
//!
//! Syntax: literal characters are emitted verbatim; `/` separates path
//! segments; `{name}` substitutes a metadata variable and `{name?default}`
//! falls back when the variable is absent or empty. The fallback may itself
//! name a variable (`{composer?artist}`) or be a literal string.

use crate::context::PatternContext;
use crate::error::PatternError;
use crate::sanitize::sanitize_segment_with_limit;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Variables a template may reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateVar {
    Artist,
    AlbumArtist,
    Album,
    Title,
    Genre,
    Year,
    /// Zero-padded 4-digit year, empty when absent
    Year4,
    /// Zero-padded 2-digit track number, `"00"` when absent
    Track,
    Disc,
    Format,
    /// Lowercased extension of the source path
    Ext,
    Composer,
    /// Source filename minus extension
    FilenameStem,
}

impl TemplateVar {
    /// The name used inside `{...}` substitutions
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Artist => "artist",
            Self::AlbumArtist => "album_artist",
            Self::Album => "album",
            Self::Title => "title",
            Self::Genre => "genre",
            Self::Year => "year",
            Self::Year4 => "year4",
            Self::Track => "track",
            Self::Disc => "disc",
            Self::Format => "format",
            Self::Ext => "ext",
            Self::Composer => "composer",
            Self::FilenameStem => "filename_stem",
        }
    }
}

impl FromStr for TemplateVar {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "artist" => Ok(Self::Artist),
            "album_artist" => Ok(Self::AlbumArtist),
            "album" => Ok(Self::Album),
            "title" => Ok(Self::Title),
            "genre" => Ok(Self::Genre),
            "year" => Ok(Self::Year),
            "year4" => Ok(Self::Year4),
            "track" => Ok(Self::Track),
            "disc" => Ok(Self::Disc),
            "format" => Ok(Self::Format),
            "ext" => Ok(Self::Ext),
            "composer" => Ok(Self::Composer),
            "filename_stem" => Ok(Self::FilenameStem),
            _ => Err(()),
        }
    }
}

impl fmt::Display for TemplateVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed token of a template segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateToken {
    /// Verbatim text
    Literal(String),

    /// `{var}` or `{var?fallback}` substitution
    Variable {
        var: TemplateVar,
        fallback: Option<String>,
    },
}

/// A parsed, validated template
///
/// Immutable after construction and freely shared across worker tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Vec<TemplateToken>>,
}

impl Template {
    /// Parse and validate a template string
    ///
    /// Rejects empty templates, unbalanced braces, and unknown variable
    /// names. Errors are returned, never raised during later evaluation.
    pub fn parse(raw: &str) -> crate::Result<Self> {
        if raw.trim().is_empty() {
            return Err(PatternError::EmptyTemplate);
        }

        let mut segments = Vec::new();
        for raw_segment in raw.split('/') {
            if raw_segment.is_empty() {
                continue;
            }
            segments.push(parse_segment(raw_segment)?);
        }

        if segments.is_empty() {
            return Err(PatternError::EmptyTemplate);
        }

        Ok(Self { segments })
    }

    /// The parsed token lists, one per path segment
    pub fn segments(&self) -> &[Vec<TemplateToken>] {
        &self.segments
    }

    /// Reconstruct the template string from its tokens
    pub fn render(&self) -> String {
        let rendered: Vec<String> = self
            .segments
            .iter()
            .map(|tokens| {
                tokens
                    .iter()
                    .map(|token| match token {
                        TemplateToken::Literal(text) => text.clone(),
                        TemplateToken::Variable {
                            var,
                            fallback: None,
                        } => format!("{{{var}}}"),
                        TemplateToken::Variable {
                            var,
                            fallback: Some(fallback),
                        } => format!("{{{var}?{fallback}}}"),
                    })
                    .collect()
            })
            .collect();
        rendered.join("/")
    }

    /// Evaluate against a per-file context into sanitized path segments
    ///
    /// Always emits at least one segment, and never a `.` or `..` segment:
    /// anything that sanitizes into a traversal component is replaced with
    /// the context's unknown-field replacement.
    pub fn evaluate(&self, context: &PatternContext<'_>) -> Vec<String> {
        self.segments
            .iter()
            .map(|tokens| {
                let mut assembled = String::new();
                for token in tokens {
                    match token {
                        TemplateToken::Literal(text) => assembled.push_str(text),
                        TemplateToken::Variable { var, fallback } => {
                            assembled.push_str(&resolve_with_fallback(
                                *var,
                                fallback.as_deref(),
                                context,
                            ));
                        }
                    }
                }

                let sanitized = sanitize_segment_with_limit(
                    &assembled,
                    context.options.max_segment_length,
                );
                if sanitized == "." || sanitized == ".." {
                    context.options.unknown_replacement.clone()
                } else {
                    sanitized
                }
            })
            .collect()
    }

    /// Evaluate into a relative path
    pub fn evaluate_path(&self, context: &PatternContext<'_>) -> PathBuf {
        self.evaluate(context).iter().collect()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Resolve one substitution, walking `value -> fallback -> builtin default`
fn resolve_with_fallback(
    var: TemplateVar,
    fallback: Option<&str>,
    context: &PatternContext<'_>,
) -> String {
    let value = context.resolve(var);
    if !value.is_empty() {
        return value;
    }

    if let Some(fallback) = fallback {
        // A fallback naming a known variable is a reference, not a literal
        if let Ok(fallback_var) = fallback.parse::<TemplateVar>() {
            let value = context.resolve(fallback_var);
            if !value.is_empty() {
                return value;
            }
            return context.builtin_default(fallback_var);
        }
        return fallback.to_string();
    }

    context.builtin_default(var)
}

/// Parse one `/`-free segment into tokens
fn parse_segment(raw: &str) -> crate::Result<Vec<TemplateToken>> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if !literal.is_empty() {
                    tokens.push(TemplateToken::Literal(std::mem::take(&mut literal)));
                }

                let mut body = String::new();
                let mut closed = false;
                for inner in chars.by_ref() {
                    match inner {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => return Err(PatternError::UnbalancedBraces(raw.to_string())),
                        other => body.push(other),
                    }
                }
                if !closed {
                    return Err(PatternError::UnbalancedBraces(raw.to_string()));
                }

                let (name, fallback) = match body.split_once('?') {
                    Some((name, fallback)) => (name, Some(fallback.to_string())),
                    None => (body.as_str(), None),
                };
                let var = name
                    .parse::<TemplateVar>()
                    .map_err(|()| PatternError::UnknownVariable(name.to_string()))?;
                tokens.push(TemplateToken::Variable { var, fallback });
            }
            '}' => return Err(PatternError::UnbalancedBraces(raw.to_string())),
            other => literal.push(other),
        }
    }

    if !literal.is_empty() {
        tokens.push(TemplateToken::Literal(literal));
    }

    Ok(tokens)
}

/// Preset templates for common layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplatePreset {
    /// `{artist}/{album}/{track} - {title}.{ext}`
    Standard,
    /// `{artist}/[{year4}] {album}/{track} - {title}.{ext}`
    WithYear,
    /// `Classical/{composer?artist}/{year4} - {album}/{track} - {title}.{ext}`
    Classical,
    /// `{genre}/{artist}/{album}/{track} - {title}.{ext}`
    GenreBased,
    /// `{artist} - {album} - {track} - {title}.{ext}`
    Flat,
    /// `{album_artist?artist}/[{year4}] {album}/{track} - {artist} - {title}.{ext}`
    Compilation,
}

impl TemplatePreset {
    /// The template string for this preset
    pub fn template(&self) -> &'static str {
        match self {
            Self::Standard => "{artist}/{album}/{track} - {title}.{ext}",
            Self::WithYear => "{artist}/[{year4}] {album}/{track} - {title}.{ext}",
            Self::Classical => {
                "Classical/{composer?artist}/{year4} - {album}/{track} - {title}.{ext}"
            }
            Self::GenreBased => "{genre}/{artist}/{album}/{track} - {title}.{ext}",
            Self::Flat => "{artist} - {album} - {track} - {title}.{ext}",
            Self::Compilation => {
                "{album_artist?artist}/[{year4}] {album}/{track} - {artist} - {title}.{ext}"
            }
        }
    }
}
