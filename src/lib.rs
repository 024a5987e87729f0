//! voicecast - channel voice posts to published podcast episodes
//!
//! A webhook-driven pipeline that turns voice messages posted to a broadcast
//! channel into podcast episodes with a generated headline, summary, and
//! topical tags.
//!
//! # Architecture
//!
//! - Each message is processed at most once: the controller claims a key in
//!   the artifact store before doing any expensive work, and duplicate
//!   deliveries observe the claim and no-op.
//! - Edits to a processed message's caption update the stored metadata and
//!   trigger a one-shot publish to the hosting service.
//! - All durable state lives in the artifact store; handler invocations are
//!   stateless.
//!
//! # Modules
//!
//! - `adapters`: Remote collaborators (speech, summarization, topics,
//!   hosting, messaging platform)
//! - `store`: Artifact storage (GCS and in-memory)
//! - `core`: The ingestion controller and metadata extractor
//! - `domain`: Episode records, storage keys, inbound update payloads
//! - `server`: Webhook and health endpoints
//! - `config`: Environment-injected configuration

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod store;

// Re-export main types at crate root for convenience
pub use crate::core::{IngestionController, MetadataExtractor, Outcome, PipelineError};
pub use config::Config;
pub use domain::{ChannelUpdate, EpisodeRecord, InboundEvent, StorageKey};
pub use store::{ArtifactStore, GcsStore, MemoryStore};
