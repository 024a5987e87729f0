//! Telegram Bot API adapter.
//!
//! Two operations back the pipeline: downloading a voice attachment
//! (`getFile` then a file-path fetch) and rewriting the caption of the
//! original channel message (`editMessageCaption`).

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::ChannelMessenger;

const API_ENDPOINT: &str = "https://api.telegram.org";

/// Telegram Bot API client
pub struct TelegramClient {
    bot_token: String,
    endpoint: String,
    client: reqwest::Client,
}

/// Envelope every Bot API method responds with
#[derive(Debug, Deserialize)]
struct TelegramResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileResult {
    file_path: Option<String>,
}

impl TelegramClient {
    pub fn new(bot_token: String, client: reqwest::Client) -> Self {
        Self {
            bot_token,
            endpoint: API_ENDPOINT.to_string(),
            client,
        }
    }

    /// Override the API endpoint (for tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.endpoint, self.bot_token, method)
    }

    fn file_url(&self, file_path: &str) -> String {
        format!("{}/file/bot{}/{}", self.endpoint, self.bot_token, file_path)
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        payload: &serde_json::Value,
    ) -> Result<T> {
        let response = self
            .client
            .post(self.api_url(method))
            .json(payload)
            .send()
            .await
            .with_context(|| format!("Failed to call Telegram method '{}'", method))?;

        let result: TelegramResponse<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse Telegram '{}' response", method))?;

        if !result.ok {
            anyhow::bail!(
                "Telegram API error from '{}': {}",
                method,
                result.description.unwrap_or_default()
            );
        }

        result
            .result
            .with_context(|| format!("Telegram '{}' response carried no result", method))
    }
}

#[async_trait]
impl ChannelMessenger for TelegramClient {
    async fn fetch_voice(&self, file_id: &str) -> Result<Vec<u8>> {
        let file: FileResult = self
            .call("getFile", &serde_json::json!({ "file_id": file_id }))
            .await?;

        let file_path = file
            .file_path
            .context("getFile response carried no file_path")?;

        let response = self
            .client
            .get(self.file_url(&file_path))
            .send()
            .await
            .context("Failed to download voice file")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Voice file download failed ({})", status);
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read voice file body")?;

        Ok(bytes.to_vec())
    }

    async fn edit_caption(&self, chat_id: i64, message_id: i64, caption: &str) -> Result<()> {
        // editMessageCaption returns the edited Message; we only need ok
        let _: serde_json::Value = self
            .call(
                "editMessageCaption",
                &serde_json::json!({
                    "chat_id": chat_id,
                    "message_id": message_id,
                    "caption": caption,
                    "parse_mode": "HTML",
                }),
            )
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url() {
        let client = TelegramClient::new("TOKEN".to_string(), reqwest::Client::new());
        assert_eq!(
            client.api_url("editMessageCaption"),
            "https://api.telegram.org/botTOKEN/editMessageCaption"
        );
        assert_eq!(
            client.file_url("voice/file_7.oga"),
            "https://api.telegram.org/file/botTOKEN/voice/file_7.oga"
        );
    }
}
