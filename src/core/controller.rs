//! The ingestion state machine.
//!
//! One stateless invocation handles one inbound event; every durable fact
//! lives in the artifact store. The controller is the sole writer of episode
//! records.
//!
//! # Idempotency
//!
//! The first action on a new voice post is a conditional create of the
//! metadata object. Whoever wins that create owns the right to run the
//! expensive pipeline; every later delivery of the same update observes the
//! object and exits without side effects. With a store whose conditional
//! create is real (GCS generation preconditions) this also holds under true
//! concurrent delivery; with an eventually-consistent backend it degrades to
//! an advisory check and duplicate processing becomes a documented race.
//!
//! # Ordering
//!
//! The caption edit on the source message happens before the final record
//! write, so any reader that sees a finished record can trust its `caption`
//! field to match what the channel displays.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::adapters::{ChannelMessenger, PodcastPublisher, Transcriber};
use crate::domain::episode::{parse_caption, render_caption};
use crate::domain::{ClaimMarker, EpisodeRecord, InboundEvent, StorageKey};
use crate::store::ArtifactStore;

use super::extractor::MetadataExtractor;

/// Hard cap on stored summary length, in characters
const SUMMARY_MAX_CHARS: usize = 500;

/// Fatal-abort failures of one event.
///
/// Degrade-and-continue outcomes (empty summary, empty tags, refused publish)
/// are not errors; they are encoded in the collaborators' return types.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("artifact store failure")]
    Store(#[source] anyhow::Error),

    #[error("messaging platform failure")]
    Messenger(#[source] anyhow::Error),

    #[error("transcription failure")]
    Transcription(#[source] anyhow::Error),

    #[error("metadata extraction failure")]
    Metadata(#[source] anyhow::Error),

    #[error("publish transport failure")]
    Publish(#[source] anyhow::Error),

    #[error("stored record at '{key}' is not parseable")]
    CorruptRecord {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("edited caption carries {fields} field(s), need 3")]
    MalformedCaption { fields: usize },
}

/// What one event amounted to. The webhook boundary acknowledges all of
/// these identically; they exist for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// New post fully ingested, record written unpublished
    Processed,

    /// Duplicate delivery of an already-claimed key; no side effects
    AlreadySeen,

    /// Update shape the pipeline does not act on
    Ignored,

    /// Edit stored; record was already published, publish not attempted
    Updated,

    /// Edit stored and the episode published
    Published,

    /// Edit stored but the hosting service refused; a later edit may retry
    PublishDeferred,
}

/// Orchestrates ingestion and republish for voice posts
pub struct IngestionController {
    store: Arc<dyn ArtifactStore>,
    transcriber: Arc<dyn Transcriber>,
    extractor: MetadataExtractor,
    publisher: Arc<dyn PodcastPublisher>,
    messenger: Arc<dyn ChannelMessenger>,
    bucket: String,
}

impl IngestionController {
    pub fn new(
        store: Arc<dyn ArtifactStore>,
        transcriber: Arc<dyn Transcriber>,
        extractor: MetadataExtractor,
        publisher: Arc<dyn PodcastPublisher>,
        messenger: Arc<dyn ChannelMessenger>,
        bucket: String,
    ) -> Self {
        Self {
            store,
            transcriber,
            extractor,
            publisher,
            messenger,
            bucket,
        }
    }

    /// Dispatch one inbound event to its handler
    pub async fn handle_event(&self, event: InboundEvent) -> Result<Outcome, PipelineError> {
        match event {
            InboundEvent::NewVoicePost {
                chat_id,
                message_id,
                voice_file_id,
            } => {
                self.handle_new_post(StorageKey::new(chat_id, message_id), &voice_file_id)
                    .await
            }
            InboundEvent::EditedVoicePost {
                chat_id,
                message_id,
                caption,
            } => {
                self.handle_edit(StorageKey::new(chat_id, message_id), caption.as_deref())
                    .await
            }
            InboundEvent::Other => Ok(Outcome::Ignored),
        }
    }

    /// Ingest a new voice post exactly once.
    #[instrument(skip(self, voice_file_id), fields(chat_id = key.chat_id, message_id = key.message_id))]
    async fn handle_new_post(
        &self,
        key: StorageKey,
        voice_file_id: &str,
    ) -> Result<Outcome, PipelineError> {
        let metadata_object = key.metadata_object();
        let audio_object = key.audio_object();

        // Claim the key before any expensive work. Losing the claim means
        // another delivery of this update got here first.
        let marker = serde_json::to_vec(&ClaimMarker::claimed()).map_err(|source| {
            PipelineError::CorruptRecord {
                key: metadata_object.clone(),
                source,
            }
        })?;
        let claimed = self
            .store
            .create_if_absent(&metadata_object, marker, "application/json")
            .await
            .map_err(PipelineError::Store)?;

        if !claimed {
            info!("Message already claimed, skipping");
            return Ok(Outcome::AlreadySeen);
        }

        // Upload audio unless a prior partial run already left it in place
        if !self
            .store
            .exists(&audio_object)
            .await
            .map_err(PipelineError::Store)?
        {
            let bytes = self
                .messenger
                .fetch_voice(voice_file_id)
                .await
                .map_err(PipelineError::Messenger)?;

            info!(size = bytes.len(), "Uploading voice audio");
            self.store
                .put(&audio_object, bytes, "audio/mpeg")
                .await
                .map_err(PipelineError::Store)?;
        }

        // Transcription failure aborts the event; the claim stays behind
        // until an operator resets it (see DESIGN notes).
        let audio_uri = format!("gs://{}/{}", self.bucket, audio_object);
        let transcript = self
            .transcriber
            .transcribe(&audio_uri)
            .await
            .map_err(PipelineError::Transcription)?;

        let derived = self
            .extractor
            .extract(&transcript)
            .await
            .map_err(PipelineError::Metadata)?;

        let summary = truncate_chars(&derived.summary, SUMMARY_MAX_CHARS);
        let tags = derived.tags.join(", ");
        let caption = render_caption(&derived.headline, &summary, &tags);

        // User-visible side effect first: the record write below must imply
        // that the displayed caption already matches.
        self.messenger
            .edit_caption(key.chat_id, key.message_id, &caption)
            .await
            .map_err(PipelineError::Messenger)?;

        let record = EpisodeRecord {
            caption,
            text: transcript,
            summary,
            tags,
            headline: derived.headline,
            filename: audio_object,
            published: false,
            player_url: None,
        };
        self.write_record(&metadata_object, &record).await?;

        info!("New voice post ingested");
        Ok(Outcome::Processed)
    }

    /// Apply an edited caption and publish-or-republish when warranted.
    #[instrument(skip(self, caption), fields(chat_id = key.chat_id, message_id = key.message_id))]
    async fn handle_edit(
        &self,
        key: StorageKey,
        caption: Option<&str>,
    ) -> Result<Outcome, PipelineError> {
        let caption = caption.unwrap_or_default();
        let fields = parse_caption(caption).ok_or_else(|| PipelineError::MalformedCaption {
            fields: caption.split('\n').count(),
        })?;

        let metadata_object = key.metadata_object();
        let existing = self
            .store
            .get(&metadata_object)
            .await
            .map_err(PipelineError::Store)?;

        let (mut record, synthesized) = match existing {
            Some(bytes) => {
                let mut record: EpisodeRecord =
                    serde_json::from_slice(&bytes).map_err(|source| {
                        PipelineError::CorruptRecord {
                            key: metadata_object.clone(),
                            source,
                        }
                    })?;
                record.summary = fields.summary;
                record.tags = fields.tags;
                record.headline = fields.headline;
                (record, false)
            }
            None => {
                // The original transcript is not recoverable from a caption,
                // so the parsed summary stands in for it.
                warn!(key = %metadata_object, "No record for edited post, synthesizing");
                (
                    EpisodeRecord {
                        caption: caption.to_string(),
                        text: fields.summary.clone(),
                        summary: fields.summary,
                        tags: fields.tags,
                        headline: fields.headline,
                        filename: key.audio_object(),
                        published: false,
                        player_url: None,
                    },
                    true,
                )
            }
        };

        // One-shot publish policy: a record that has been published once is
        // never republished by an edit, however much its text changed.
        if !synthesized && record.published {
            self.write_record(&metadata_object, &record).await?;
            info!("Edit stored, record already published");
            return Ok(Outcome::Updated);
        }

        let media_url = format!(
            "https://storage.cloud.google.com/{}/{}",
            self.bucket, record.filename
        );
        let player_url = self
            .publisher
            .publish(&media_url, &record.headline, &record.summary)
            .await
            .map_err(PipelineError::Publish)?;

        let outcome = match player_url {
            Some(url) => {
                record.player_url = Some(url);
                record.published = true;
                Outcome::Published
            }
            None => {
                warn!(key = %metadata_object, "Publish refused, leaving record unpublished");
                Outcome::PublishDeferred
            }
        };

        self.write_record(&metadata_object, &record).await?;
        info!(?outcome, "Edited voice post handled");
        Ok(outcome)
    }

    /// Replace the metadata record in one whole-object write
    async fn write_record(
        &self,
        metadata_object: &str,
        record: &EpisodeRecord,
    ) -> Result<(), PipelineError> {
        let bytes = serde_json::to_vec(record).map_err(|source| PipelineError::CorruptRecord {
            key: metadata_object.to_string(),
            source,
        })?;

        self.store
            .put(metadata_object, bytes, "application/json")
            .await
            .map_err(PipelineError::Store)
    }
}

/// Cut a string to at most `max` characters, on char boundaries
fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
