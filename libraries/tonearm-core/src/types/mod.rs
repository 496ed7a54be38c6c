//! Domain types shared by the engine crates

mod audio_file;
mod metadata;

pub use audio_file::AudioFile;
pub use metadata::{TrackMetadata, TrackMetadataBuilder};
