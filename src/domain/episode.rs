//! Episode records and artifact keys.
//!
//! One episode record exists per `(channel_id, message_id)` pair. The record is
//! the source of truth for a processed voice post: it is written once by the
//! ingestion controller when a new post completes, and replaced whole on every
//! subsequent edit. No component ever patches individual fields in place.

use serde::{Deserialize, Serialize};

/// Deterministic artifact key for one voice message.
///
/// Both artifacts of a message (audio bytes and metadata record) derive their
/// object names from this key, so a message maps to exactly one pair of
/// objects regardless of how many times its update is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageKey {
    pub chat_id: i64,
    pub message_id: i64,
}

impl StorageKey {
    pub fn new(chat_id: i64, message_id: i64) -> Self {
        Self {
            chat_id,
            message_id,
        }
    }

    /// Object name for the raw audio artifact
    pub fn audio_object(&self) -> String {
        format!("{}/{}.mp3", self.chat_id, self.message_id)
    }

    /// Object name for the metadata record
    pub fn metadata_object(&self) -> String {
        format!("{}/{}.json", self.chat_id, self.message_id)
    }
}

/// Persisted metadata for one processed voice message.
///
/// `filename` (the audio object name) never changes after first write, and
/// `published` only ever transitions false to true.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// Last caption rendered back onto the source message
    pub caption: String,

    /// Full recognized transcript (write-once)
    pub text: String,

    /// Derived summary, capped at 500 characters
    pub summary: String,

    /// Comma-joined display tags, e.g. "#jazz, #climate_change"
    pub tags: String,

    /// One-sentence headline, trailing period stripped
    pub headline: String,

    /// Audio object name this record describes (immutable)
    pub filename: String,

    /// True once a publish call has succeeded; never reverts
    pub published: bool,

    /// Public player URL, present only once a publish succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_url: Option<String>,
}

/// Placeholder written to claim a key before any expensive work runs.
///
/// A second delivery of the same update sees this object and exits early.
/// Deliberately not parseable as an [`EpisodeRecord`]: an edit racing a
/// still-in-flight new post must not mistake the claim for a finished record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimMarker {
    pub run: bool,
}

impl ClaimMarker {
    pub fn claimed() -> Self {
        Self { run: true }
    }
}

/// The three caption fields an edited post carries, one per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionFields {
    pub headline: String,
    pub summary: String,
    pub tags: String,
}

/// Render the display caption: bold headline, summary, comma-joined tags.
pub fn render_caption(headline: &str, summary: &str, tags: &str) -> String {
    format!("<b>{}</b>\n{}\n{}", headline, summary, tags)
}

/// Parse an edited caption back into its three fields.
///
/// Splits on `\n` (not [`str::lines`], which drops a trailing empty field and
/// would reject our own rendered caption when the tag line is empty). Returns
/// `None` when fewer than three fields are present.
pub fn parse_caption(caption: &str) -> Option<CaptionFields> {
    let mut parts = caption.split('\n');
    let headline = parts.next()?;
    let summary = parts.next()?;
    let tags = parts.next()?;

    Some(CaptionFields {
        headline: headline.to_string(),
        summary: summary.to_string(),
        tags: tags.to_string(),
    })
}
