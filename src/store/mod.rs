//! Artifact storage for audio bytes and metadata records.
//!
//! The store is the only durable state in the system. The controller relies on
//! `create_if_absent` for its processing claim, so an implementation should
//! provide conditional-create with read-after-write visibility for the same
//! key. [`GcsStore`] does (generation preconditions); a backend that can only
//! offer eventual consistency turns the claim into an advisory check and must
//! document the resulting duplicate-processing race.

pub mod gcs;
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

pub use gcs::GcsStore;
pub use memory::MemoryStore;

/// Key-value object store holding the pipeline's two artifact kinds.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Whether an object exists at `name`
    async fn exists(&self, name: &str) -> Result<bool>;

    /// Fetch an object, `None` if absent
    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>>;

    /// Write an object, replacing any previous content atomically
    async fn put(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<()>;

    /// Create an object only if no object exists at `name`.
    ///
    /// Returns `true` when this call created the object, `false` when the
    /// name was already taken. The first caller to get `true` owns the
    /// processing claim for that key.
    async fn create_if_absent(&self, name: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<bool>;
}
