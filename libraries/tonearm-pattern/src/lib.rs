//! Pattern-driven target path generation
//!
//! A template is a `/`-separated string over metadata variables, parsed once
//! and shared read-only across worker tasks. Evaluation binds a per-file
//! [`PatternContext`] and emits sanitized path segments; the last segment is
//! the filename and carries the extension.
//!
//! # Example
//!
//! ```rust
//! use tonearm_pattern::{PatternContext, Template};
//! use tonearm_core::TrackMetadata;
//! use std::path::Path;
//!
//! let template = Template::parse("{artist}/{album}/{track} - {title}.{ext}").unwrap();
//! let metadata = TrackMetadata::builder()
//!     .artist("Eagles")
//!     .album("Hotel California")
//!     .title("Hotel California")
//!     .track_number(1)
//!     .build();
//! let context = PatternContext::new(&metadata, Path::new("/in/song.mp3"));
//!
//! let segments = template.evaluate(&context);
//! assert_eq!(segments, ["Eagles", "Hotel California", "01 - Hotel California.mp3"]);
//! ```

#![forbid(unsafe_code)]

mod error;

pub mod context;
pub mod sanitize;
pub mod template;

pub use context::{PatternContext, PatternOptions};
pub use error::PatternError;
pub use sanitize::{sanitize_segment, sanitize_segment_with_limit, MAX_SEGMENT_LENGTH};
pub use template::{Template, TemplatePreset, TemplateToken, TemplateVar};

/// Re-export commonly used types
pub type Result<T> = std::result::Result<T, PatternError>;
