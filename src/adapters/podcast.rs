//! Podcast-hosting publish gateway (Podbean-style API).
//!
//! Two calls per publish: an OAuth client-credentials token exchange, then
//! the episode-creation call referencing the public media URL. Either call
//! answering non-ok degrades to "no player URL" so a failed publish never
//! aborts the event; a later edit retries it.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use super::PodcastPublisher;

const HOSTING_ENDPOINT: &str = "https://api.podbean.com/v1";

/// Podcast hosting client
pub struct PodcastClient {
    client_id: String,
    client_secret: String,
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct EpisodeResponse {
    #[serde(default)]
    episode: Option<Episode>,
}

#[derive(Debug, Deserialize)]
struct Episode {
    #[serde(default)]
    player_url: Option<String>,
}

impl PodcastClient {
    pub fn new(client_id: String, client_secret: String, client: reqwest::Client) -> Self {
        Self {
            client_id,
            client_secret,
            endpoint: HOSTING_ENDPOINT.to_string(),
            client,
        }
    }

    /// Override the API endpoint (for tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Client-credentials token exchange; `None` on a non-ok answer
    async fn fetch_token(&self) -> Result<Option<String>> {
        let response = self
            .client
            .post(format!("{}/oauth/token", self.endpoint))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .context("Failed to call hosting token exchange")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, %body, "Hosting token exchange answered non-ok");
            return Ok(None);
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse hosting token response")?;

        Ok(Some(token.access_token))
    }
}

#[async_trait]
impl PodcastPublisher for PodcastClient {
    async fn publish(
        &self,
        media_url: &str,
        title: &str,
        content: &str,
    ) -> Result<Option<String>> {
        let token = match self.fetch_token().await? {
            Some(token) => token,
            None => return Ok(None),
        };

        let form = [
            ("access_token", token.as_str()),
            ("title", title),
            ("content", content),
            ("status", "publish"),
            ("type", "public"),
            ("remote_media_url", media_url),
        ];

        let response = self
            .client
            .post(format!("{}/episodes", self.endpoint))
            .form(&form)
            .send()
            .await
            .context("Failed to call episode creation")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, %body, "Episode creation answered non-ok");
            return Ok(None);
        }

        let parsed: EpisodeResponse = response
            .json()
            .await
            .context("Failed to parse episode creation response")?;

        Ok(parsed.episode.and_then(|e| e.player_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_response_parsing() {
        let parsed: EpisodeResponse = serde_json::from_str(
            r#"{"episode": {"player_url": "https://host.example/player/e1"}}"#,
        )
        .unwrap();
        assert_eq!(
            parsed.episode.and_then(|e| e.player_url).as_deref(),
            Some("https://host.example/player/e1")
        );
    }

    #[test]
    fn test_episode_response_without_player_url() {
        let parsed: EpisodeResponse = serde_json::from_str(r#"{"episode": {}}"#).unwrap();
        assert!(parsed.episode.and_then(|e| e.player_url).is_none());

        let parsed: EpisodeResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.episode.is_none());
    }
}
