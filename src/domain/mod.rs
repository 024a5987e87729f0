//! Data structures for the ingestion pipeline.

pub mod episode;
pub mod update;

pub use episode::{CaptionFields, ClaimMarker, EpisodeRecord, StorageKey};
pub use update::{ChannelUpdate, InboundEvent};
