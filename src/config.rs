//! Environment-injected configuration.
//!
//! Every credential the pipeline needs comes from the environment and is
//! checked for presence at startup; nothing is defaulted or embedded in
//! code. Only the request timeout has a default.

use std::time::Duration;

use anyhow::{Context, Result};

/// Default per-request timeout for all remote calls
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration, resolved once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Messaging-platform bot token
    pub telegram_bot_token: String,

    /// Bucket holding audio and metadata artifacts
    pub storage_bucket: String,

    /// OAuth access token for the storage API
    pub storage_access_token: String,

    /// Speech recognition API key
    pub speech_api_key: String,

    /// Summarization API key
    pub summary_api_key: String,

    /// Topic analysis API key
    pub topic_api_key: String,

    /// Podcast hosting OAuth client credentials
    pub podcast_client_id: String,
    pub podcast_client_secret: String,

    /// Explicit timeout applied to every remote call
    pub http_timeout: Duration,
}

impl Config {
    /// Resolve configuration from the environment, failing on any missing
    /// credential.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            telegram_bot_token: required("TELEGRAM_BOT_TOKEN")?,
            storage_bucket: required("STORAGE_BUCKET")?,
            storage_access_token: required("STORAGE_ACCESS_TOKEN")?,
            speech_api_key: required("SPEECH_API_KEY")?,
            summary_api_key: required("SUMMARY_API_KEY")?,
            topic_api_key: required("TOPIC_API_KEY")?,
            podcast_client_id: required("PODCAST_CLIENT_ID")?,
            podcast_client_secret: required("PODCAST_CLIENT_SECRET")?,
            http_timeout: timeout_from(std::env::var("HTTP_TIMEOUT_SECS").ok())?,
        })
    }
}

fn required(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{} environment variable required", name))
}

fn timeout_from(raw: Option<String>) -> Result<Duration> {
    let secs = match raw {
        Some(value) => value
            .parse::<u64>()
            .with_context(|| format!("HTTP_TIMEOUT_SECS is not a number: '{}'", value))?,
        None => DEFAULT_HTTP_TIMEOUT_SECS,
    };
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_variable_names_itself() {
        let err = required("VOICECAST_TEST_UNSET_VARIABLE").unwrap_err();
        assert!(err.to_string().contains("VOICECAST_TEST_UNSET_VARIABLE"));
    }

    #[test]
    fn test_timeout_default_and_override() {
        assert_eq!(timeout_from(None).unwrap(), Duration::from_secs(30));
        assert_eq!(
            timeout_from(Some("5".to_string())).unwrap(),
            Duration::from_secs(5)
        );
        assert!(timeout_from(Some("soon".to_string())).is_err());
    }
}
