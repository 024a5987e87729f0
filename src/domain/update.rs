//! Inbound messaging-platform update payloads.
//!
//! The webhook receives Telegram Bot API `Update` objects. Only two shapes
//! drive the pipeline: a new channel post carrying a voice attachment, and an
//! edit of such a post. Everything else maps to [`InboundEvent::Other`] and is
//! acknowledged without action.

use serde::Deserialize;

/// Raw update payload as delivered to the webhook.
///
/// All fields are optional so that unrecognized update shapes deserialize
/// cleanly instead of erroring.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelUpdate {
    #[serde(default)]
    pub update_id: Option<i64>,

    #[serde(default)]
    pub channel_post: Option<ChannelPost>,

    #[serde(default)]
    pub edited_channel_post: Option<ChannelPost>,
}

/// A channel post (new or edited)
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelPost {
    pub message_id: i64,
    pub chat: Chat,

    #[serde(default)]
    pub voice: Option<Voice>,

    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Voice attachment metadata
#[derive(Debug, Clone, Deserialize)]
pub struct Voice {
    pub file_id: String,

    #[serde(default)]
    pub duration: Option<u32>,
}

/// The tagged union the controller dispatches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A new voice post that has not been seen before
    NewVoicePost {
        chat_id: i64,
        message_id: i64,
        voice_file_id: String,
    },

    /// An edit to the caption of a previously posted voice message
    EditedVoicePost {
        chat_id: i64,
        message_id: i64,
        caption: Option<String>,
    },

    /// Any other update shape; acknowledged with no action
    Other,
}

impl ChannelUpdate {
    /// Classify the update into the event the controller understands.
    ///
    /// Posts without a voice attachment are `Other`, matching the contract
    /// that the pipeline only ever reacts to voice content.
    pub fn into_event(self) -> InboundEvent {
        if let Some(post) = self.channel_post {
            if let Some(voice) = post.voice {
                return InboundEvent::NewVoicePost {
                    chat_id: post.chat.id,
                    message_id: post.message_id,
                    voice_file_id: voice.file_id,
                };
            }
        } else if let Some(post) = self.edited_channel_post {
            if post.voice.is_some() {
                return InboundEvent::EditedVoicePost {
                    chat_id: post.chat.id,
                    message_id: post.message_id,
                    caption: post.caption,
                };
            }
        }

        InboundEvent::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> InboundEvent {
        serde_json::from_str::<ChannelUpdate>(json)
            .unwrap()
            .into_event()
    }

    #[test]
    fn test_new_voice_post() {
        let event = parse(
            r#"{
                "update_id": 7,
                "channel_post": {
                    "message_id": 42,
                    "chat": {"id": -100123},
                    "voice": {"file_id": "abc", "duration": 12}
                }
            }"#,
        );

        assert_eq!(
            event,
            InboundEvent::NewVoicePost {
                chat_id: -100123,
                message_id: 42,
                voice_file_id: "abc".to_string(),
            }
        );
    }

    #[test]
    fn test_edited_voice_post() {
        let event = parse(
            r#"{
                "edited_channel_post": {
                    "message_id": 42,
                    "chat": {"id": -100123},
                    "voice": {"file_id": "abc"},
                    "caption": "a\nb\nc"
                }
            }"#,
        );

        assert_eq!(
            event,
            InboundEvent::EditedVoicePost {
                chat_id: -100123,
                message_id: 42,
                caption: Some("a\nb\nc".to_string()),
            }
        );
    }

    #[test]
    fn test_text_post_is_other() {
        let event = parse(
            r#"{
                "channel_post": {
                    "message_id": 1,
                    "chat": {"id": 2},
                    "text": "no voice here"
                }
            }"#,
        );
        assert_eq!(event, InboundEvent::Other);
    }

    #[test]
    fn test_edited_post_without_voice_is_other() {
        let event = parse(
            r#"{
                "edited_channel_post": {
                    "message_id": 1,
                    "chat": {"id": 2},
                    "caption": "a\nb\nc"
                }
            }"#,
        );
        assert_eq!(event, InboundEvent::Other);
    }

    #[test]
    fn test_unrecognized_update_is_other() {
        assert_eq!(parse(r#"{"update_id": 9}"#), InboundEvent::Other);
        assert_eq!(
            parse(r#"{"message": {"message_id": 1, "chat": {"id": 2}}}"#),
            InboundEvent::Other
        );
    }
}
