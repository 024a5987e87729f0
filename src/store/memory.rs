//! In-memory artifact store for tests and local runs.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use super::ArtifactStore;

/// HashMap-backed store with the same conditional-create semantics as GCS
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects (test helper)
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove an object, as an operator would to reset a stuck claim
    pub fn remove(&self, name: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().remove(name)
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.objects.lock().unwrap().contains_key(name))
    }

    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.objects.lock().unwrap().get(name).cloned())
    }

    async fn put(&self, name: &str, bytes: Vec<u8>, _content_type: &str) -> Result<()> {
        self.objects.lock().unwrap().insert(name.to_string(), bytes);
        Ok(())
    }

    async fn create_if_absent(
        &self,
        name: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<bool> {
        let mut objects = self.objects.lock().unwrap();
        if objects.contains_key(name) {
            return Ok(false);
        }
        objects.insert(name.to_string(), bytes);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get("a").await.unwrap().is_none());

        store.put("a", b"bytes".to_vec(), "audio/mpeg").await.unwrap();
        assert!(store.exists("a").await.unwrap());
        assert_eq!(store.get("a").await.unwrap().unwrap(), b"bytes");
    }

    #[tokio::test]
    async fn test_create_if_absent_claims_once() {
        let store = MemoryStore::new();

        assert!(store
            .create_if_absent("k", b"first".to_vec(), "application/json")
            .await
            .unwrap());
        assert!(!store
            .create_if_absent("k", b"second".to_vec(), "application/json")
            .await
            .unwrap());

        // Losing writer must not overwrite the claim
        assert_eq!(store.get("k").await.unwrap().unwrap(), b"first");
    }

    #[tokio::test]
    async fn test_put_replaces_whole_object() {
        let store = MemoryStore::new();
        store.put("k", b"v1".to_vec(), "application/json").await.unwrap();
        store.put("k", b"v2".to_vec(), "application/json").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().unwrap(), b"v2");
        assert_eq!(store.len(), 1);
    }
}
