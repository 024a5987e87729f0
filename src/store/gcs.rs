//! Google Cloud Storage implementation of the artifact store.
//!
//! Uses the JSON/upload REST APIs directly via reqwest. The conditional
//! create is backed by `ifGenerationMatch=0`: GCS answers 412 when the object
//! already exists, which makes the processing claim an actual
//! compare-and-create rather than a check-then-write.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;

use super::ArtifactStore;

const STORAGE_ENDPOINT: &str = "https://storage.googleapis.com";

/// Artifact store backed by a single GCS bucket
pub struct GcsStore {
    bucket: String,
    access_token: String,
    endpoint: String,
    client: reqwest::Client,
}

impl GcsStore {
    pub fn new(bucket: String, access_token: String, client: reqwest::Client) -> Self {
        Self {
            bucket,
            access_token,
            endpoint: STORAGE_ENDPOINT.to_string(),
            client,
        }
    }

    /// Override the API endpoint (for tests against a local emulator)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Object metadata URL; object names contain `/` which must be escaped
    fn object_url(&self, name: &str) -> String {
        format!(
            "{}/storage/v1/b/{}/o/{}",
            self.endpoint,
            self.bucket,
            name.replace('/', "%2F")
        )
    }

    fn upload_url(&self, name: &str) -> String {
        format!(
            "{}/upload/storage/v1/b/{}/o?uploadType=media&name={}",
            self.endpoint,
            self.bucket,
            name.replace('/', "%2F")
        )
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

#[async_trait]
impl ArtifactStore for GcsStore {
    async fn exists(&self, name: &str) -> Result<bool> {
        let response = self
            .client
            .get(self.object_url(name))
            .header("Authorization", self.bearer())
            .send()
            .await
            .with_context(|| format!("Failed to stat object '{}'", name))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            Ok(false)
        } else if status.is_success() {
            Ok(true)
        } else {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Stat of '{}' failed ({}): {}", name, status, body)
        }
    }

    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let url = format!("{}?alt=media", self.object_url(name));
        let response = self
            .client
            .get(url)
            .header("Authorization", self.bearer())
            .send()
            .await
            .with_context(|| format!("Failed to fetch object '{}'", name))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            Ok(None)
        } else if status.is_success() {
            let bytes = response
                .bytes()
                .await
                .with_context(|| format!("Failed to read body of '{}'", name))?;
            Ok(Some(bytes.to_vec()))
        } else {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Fetch of '{}' failed ({}): {}", name, status, body)
        }
    }

    async fn put(&self, name: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        let response = self
            .client
            .post(self.upload_url(name))
            .header("Authorization", self.bearer())
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await
            .with_context(|| format!("Failed to upload object '{}'", name))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Upload of '{}' failed ({}): {}", name, status, body);
        }

        Ok(())
    }

    async fn create_if_absent(
        &self,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<bool> {
        let url = format!("{}&ifGenerationMatch=0", self.upload_url(name));
        let response = self
            .client
            .post(url)
            .header("Authorization", self.bearer())
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await
            .with_context(|| format!("Failed conditional create of object '{}'", name))?;

        let status = response.status();
        if status == StatusCode::PRECONDITION_FAILED {
            // Generation precondition failed: someone else holds the claim
            Ok(false)
        } else if status.is_success() {
            Ok(true)
        } else {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Conditional create of '{}' failed ({}): {}",
                name,
                status,
                body
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_url_escapes_slashes() {
        let store = GcsStore::new(
            "podcasts".to_string(),
            "token".to_string(),
            reqwest::Client::new(),
        );

        assert_eq!(
            store.object_url("123/45.json"),
            "https://storage.googleapis.com/storage/v1/b/podcasts/o/123%2F45.json"
        );
        assert_eq!(
            store.upload_url("123/45.mp3"),
            "https://storage.googleapis.com/upload/storage/v1/b/podcasts/o?uploadType=media&name=123%2F45.mp3"
        );
    }
}
