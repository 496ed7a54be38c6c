//! Tag and header metadata extraction plus content fingerprinting
//!
//! - `extractor`: reads tag fields by logical key through lofty and builds
//!   an immutable `TrackMetadata` record
//! - `hasher`: streaming SHA-256 content digests
//!
//! Both are pure with respect to the file: nothing is ever written back.

#![forbid(unsafe_code)]

mod error;

pub mod extractor;
pub mod hasher;

pub use error::MetadataError;
pub use extractor::extract_metadata;
pub use hasher::calculate_file_hash;

/// Re-export commonly used types
pub type Result<T> = std::result::Result<T, MetadataError>;
