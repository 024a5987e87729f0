//! Remote summarization gateway (MeaningCloud-style form API).
//!
//! One endpoint serves both derived fields: the 4-sentence summary and the
//! 1-sentence headline. A non-ok answer degrades to an empty string so a
//! missing summary never blocks ingestion.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use super::Summarizer;

const SUMMARIZATION_ENDPOINT: &str = "https://api.meaningcloud.com/summarization-1.0";

/// Summarization service client
pub struct SummaryClient {
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    summary: String,
}

impl SummaryClient {
    pub fn new(api_key: String, client: reqwest::Client) -> Self {
        Self {
            api_key,
            endpoint: SUMMARIZATION_ENDPOINT.to_string(),
            client,
        }
    }

    /// Override the API endpoint (for tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl Summarizer for SummaryClient {
    async fn summarize(&self, text: &str, sentences: u8) -> Result<String> {
        let form = [
            ("key", self.api_key.as_str()),
            ("of", "JSON"),
            ("txt", text),
            ("sentences", &sentences.to_string()),
        ];

        let response = self
            .client
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await
            .context("Failed to call summarization")?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, sentences, "Summarization answered non-ok, degrading to empty");
            return Ok(String::new());
        }

        let parsed: SummaryResponse = response
            .json()
            .await
            .context("Failed to parse summarization response")?;

        Ok(parsed.summary)
    }
}
