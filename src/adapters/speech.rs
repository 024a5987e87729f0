//! Speech-to-text gateway over the Google Speech REST API.
//!
//! Synchronous recognition against an audio object already in storage. The
//! request pins the parameters the channel audio is known to have: MP3 at
//! 44.1kHz, en-US, automatic punctuation on.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::Transcriber;

const SPEECH_ENDPOINT: &str = "https://speech.googleapis.com/v1p1beta1/speech:recognize";

/// Google Speech-to-Text client
pub struct SpeechClient {
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig {
    encoding: &'static str,
    sample_rate_hertz: u32,
    language_code: &'static str,
    enable_automatic_punctuation: bool,
}

#[derive(Debug, Serialize)]
struct RecognizeRequest<'a> {
    config: RecognitionConfig,
    audio: RecognitionAudio<'a>,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio<'a> {
    uri: &'a str,
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<RecognitionAlternative>,
}

#[derive(Debug, Deserialize)]
struct RecognitionAlternative {
    #[serde(default)]
    transcript: String,
}

impl SpeechClient {
    pub fn new(api_key: String, client: reqwest::Client) -> Self {
        Self {
            api_key,
            endpoint: SPEECH_ENDPOINT.to_string(),
            client,
        }
    }

    /// Override the API endpoint (for tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Join the top alternative of each recognized segment, in order
    fn join_transcripts(response: RecognizeResponse) -> String {
        response
            .results
            .iter()
            .filter_map(|r| r.alternatives.first())
            .map(|a| a.transcript.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl Transcriber for SpeechClient {
    async fn transcribe(&self, audio_uri: &str) -> Result<String> {
        let request = RecognizeRequest {
            config: RecognitionConfig {
                encoding: "MP3",
                sample_rate_hertz: 44100,
                language_code: "en-US",
                enable_automatic_punctuation: true,
            },
            audio: RecognitionAudio { uri: audio_uri },
        };

        let url = format!("{}?key={}", self.endpoint, self.api_key);
        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .context("Failed to call speech recognition")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Speech recognition failed ({}): {}", status, body);
        }

        let parsed: RecognizeResponse = response
            .json()
            .await
            .context("Failed to parse speech recognition response")?;

        Ok(Self::join_transcripts(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_transcripts_in_order() {
        let response: RecognizeResponse = serde_json::from_str(
            r#"{
                "results": [
                    {"alternatives": [{"transcript": "the quick"}, {"transcript": "ignored"}]},
                    {"alternatives": [{"transcript": "brown fox"}]}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(
            SpeechClient::join_transcripts(response),
            "the quick brown fox"
        );
    }

    #[test]
    fn test_join_transcripts_empty_response() {
        let response: RecognizeResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(SpeechClient::join_transcripts(response), "");
    }
}
