//! Topic and category scoring gateway (TextRazor-style API).
//!
//! Runs the IAB category classifier and the topic extractor in one request
//! and returns both label lists with their scores. Turning scored labels into
//! display tags is the extractor's job, not this adapter's.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use super::TopicAnalyzer;

const ANALYSIS_ENDPOINT: &str = "https://api.textrazor.com";

/// Topic analysis client
pub struct TopicClient {
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
}

/// A label with the engine's confidence score
#[derive(Debug, Clone, Deserialize)]
pub struct ScoredLabel {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub score: f64,
}

/// Both scoring passes over one transcript
#[derive(Debug, Clone, Default)]
pub struct TopicAnalysis {
    /// Hierarchical category labels, e.g. "Arts>Music>Jazz"
    pub categories: Vec<ScoredLabel>,
    /// Flat topic labels
    pub topics: Vec<ScoredLabel>,
}

#[derive(Debug, Deserialize)]
struct AnalysisEnvelope {
    #[serde(default)]
    response: AnalysisBody,
}

#[derive(Debug, Default, Deserialize)]
struct AnalysisBody {
    #[serde(default)]
    categories: Vec<ScoredLabel>,
    #[serde(default)]
    topics: Vec<ScoredLabel>,
}

impl TopicClient {
    pub fn new(api_key: String, client: reqwest::Client) -> Self {
        Self {
            api_key,
            endpoint: ANALYSIS_ENDPOINT.to_string(),
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
impl TopicAnalyzer for TopicClient {
    async fn analyze(&self, text: &str) -> Result<TopicAnalysis> {
        let form = [
            ("extractors", "topics"),
            ("classifiers", "textrazor_iab"),
            ("text", text),
        ];

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-textrazor-key", &self.api_key)
            .form(&form)
            .send()
            .await
            .context("Failed to call topic analysis")?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Topic analysis answered non-ok, degrading to no tags");
            return Ok(TopicAnalysis::default());
        }

        let parsed: AnalysisEnvelope = response
            .json()
            .await
            .context("Failed to parse topic analysis response")?;

        Ok(TopicAnalysis {
            categories: parsed.response.categories,
            topics: parsed.response.topics,
        })
    }
}
