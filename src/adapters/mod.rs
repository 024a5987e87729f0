//! Adapters for the remote collaborators of the pipeline.
//!
//! Each external engine sits behind a small trait so the controller can be
//! exercised against fakes. The HTTP implementations share one configured
//! reqwest client (and with it one explicit request timeout).
//!
//! Failure contracts differ per collaborator and are part of each trait's
//! documentation: summarization, tagging, and publishing degrade on a non-ok
//! response; transcription and caption edits surface errors to the caller.

pub mod podcast;
pub mod speech;
pub mod summarizer;
pub mod tagger;
pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;

pub use podcast::PodcastClient;
pub use speech::SpeechClient;
pub use summarizer::SummaryClient;
pub use tagger::{ScoredLabel, TopicAnalysis, TopicClient};
pub use telegram::TelegramClient;

/// Speech-to-text over a stored audio artifact.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Recognize speech at a durable storage URI, returning plain text.
    ///
    /// Errors are fatal for the event being processed.
    async fn transcribe(&self, audio_uri: &str) -> Result<String>;
}

/// N-sentence text summarization.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize `text` in `sentences` sentences.
    ///
    /// A non-ok response from the engine yields `Ok("")`; only transport
    /// failures are errors.
    async fn summarize(&self, text: &str, sentences: u8) -> Result<String>;
}

/// Topic and category scoring over a transcript.
#[async_trait]
pub trait TopicAnalyzer: Send + Sync {
    /// Score categories and topics for `text`.
    ///
    /// A non-ok response yields an empty analysis; only transport failures
    /// are errors.
    async fn analyze(&self, text: &str) -> Result<TopicAnalysis>;
}

/// Podcast-hosting publish call.
#[async_trait]
pub trait PodcastPublisher: Send + Sync {
    /// Publish an episode from a public media URL.
    ///
    /// Returns the public player URL, or `None` when the hosting service
    /// answered non-ok (the caller leaves the record unpublished and a later
    /// edit may retry). Only transport failures are errors.
    async fn publish(&self, media_url: &str, title: &str, content: &str)
        -> Result<Option<String>>;
}

/// Operations against the source messaging platform.
#[async_trait]
pub trait ChannelMessenger: Send + Sync {
    /// Download the raw bytes of a voice attachment
    async fn fetch_voice(&self, file_id: &str) -> Result<Vec<u8>>;

    /// Replace the caption of a channel message (HTML formatting)
    async fn edit_caption(&self, chat_id: i64, message_id: i64, caption: &str) -> Result<()>;
}
