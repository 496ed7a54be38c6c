//! Tonearm Core
//!
//! Shared types, traits, and error handling for the Tonearm collection
//! organizer engines.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `TrackMetadata` (with builder), `AudioFile`
//! - **Progress Bus**: the `ProgressObserver` trait and the operation names
//!   the engines report under
//! - **Cancellation**: a shared `CancellationFlag` checked by every bulk
//!   coordinator
//! - **Enricher Seam**: the `MetadataEnricher` trait for external metadata
//!   lookup, kept opaque to the core
//!
//! # Example
//!
//! ```rust
//! use tonearm_core::types::TrackMetadata;
//!
//! let metadata = TrackMetadata::builder()
//!     .title("Hotel California")
//!     .artist("Eagles")
//!     .year(1976)
//!     .track_number(1)
//!     .build();
//!
//! assert_eq!(metadata.year, Some(1976));
//! ```

#![forbid(unsafe_code)]

pub mod cancel;
pub mod enrich;
pub mod error;
pub mod progress;
pub mod types;

// Re-export commonly used types
pub use cancel::CancellationFlag;
pub use enrich::{enrich_collection, EnrichOutcome, MetadataEnricher, NoopEnricher};
pub use error::{Result, TonearmError};
pub use progress::{operations, ObserverExt, ProgressObserver, SharedObserver};
pub use types::{AudioFile, TrackMetadata, TrackMetadataBuilder};
