//! Room events delivered to the plugin.
//!
//! This module defines the inbound event model: messages, reactions, and the
//! transient audio attachment produced when a voice message is downloaded.
//! The host chat SDK maps its own wire types onto these before dispatch.

use serde::{Deserialize, Serialize};

/// An inbound event in a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomEvent {
    /// Event ID, unique within the room.
    pub event_id: String,
    /// Room the event occurred in.
    pub room_id: String,
    /// Sender's user ID.
    pub sender: String,
    /// Event payload.
    pub content: EventContent,
}

impl RoomEvent {
    /// Create a message event.
    pub fn message(
        event_id: impl Into<String>,
        room_id: impl Into<String>,
        sender: impl Into<String>,
        content: MessageContent,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            room_id: room_id.into(),
            sender: sender.into(),
            content: EventContent::Message(content),
        }
    }

    /// Create a reaction event.
    pub fn reaction(
        event_id: impl Into<String>,
        room_id: impl Into<String>,
        sender: impl Into<String>,
        content: ReactionContent,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            room_id: room_id.into(),
            sender: sender.into(),
            content: EventContent::Reaction(content),
        }
    }

    /// The message content, if this is a message event.
    #[must_use]
    pub fn as_message(&self) -> Option<&MessageContent> {
        match &self.content {
            EventContent::Message(m) => Some(m),
            _ => None,
        }
    }

    /// Whether this event is an audio message.
    #[must_use]
    pub fn is_audio(&self) -> bool {
        self.as_message().is_some_and(|m| m.kind == MessageKind::Audio)
    }
}

/// Event payload variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventContent {
    /// A room message.
    Message(MessageContent),
    /// A reaction to another event.
    Reaction(ReactionContent),
    /// Any other event type; always dropped by the router.
    Other,
}

/// Message content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageContent {
    /// Message type.
    pub kind: MessageKind,
    /// Text body (for audio messages, usually the file name).
    pub body: String,
    /// Media reference, present on media messages.
    #[serde(default)]
    pub media: Option<MediaSource>,
    /// MIME type of the attached media, if known.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Event ID this message replies to, if any.
    #[serde(default)]
    pub reply_to: Option<String>,
}

impl MessageContent {
    /// Create a text message.
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Text,
            body: body.into(),
            media: None,
            mime_type: None,
            reply_to: None,
        }
    }

    /// Create an audio message with the given media source.
    pub fn audio(body: impl Into<String>, media: MediaSource) -> Self {
        Self {
            kind: MessageKind::Audio,
            body: body.into(),
            media: Some(media),
            mime_type: None,
            reply_to: None,
        }
    }

    /// Set the MIME type.
    #[must_use]
    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }

    /// Set the reply target.
    #[must_use]
    pub fn with_reply_to(mut self, event_id: impl Into<String>) -> Self {
        self.reply_to = Some(event_id.into());
        self
    }
}

/// Message type, mirroring the chat protocol's msgtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Plain text.
    Text,
    /// Audio file or voice message.
    Audio,
    /// Image.
    Image,
    /// Video.
    Video,
    /// Generic file.
    File,
    /// Anything else.
    Other,
}

/// Where a media payload lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaSource {
    /// Unencrypted media, fetched directly by URL.
    Plain {
        /// Content URL (e.g. an `mxc://` URI).
        url: String,
    },
    /// Encrypted media; ciphertext is fetched and decrypted by the client.
    Encrypted(EncryptedFile),
}

/// Reference to an encrypted media file.
///
/// Key material travels with the message; decryption itself is delegated to
/// the chat client's crypto layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedFile {
    /// Ciphertext URL.
    pub url: String,
    /// Base64 AES key.
    pub key: String,
    /// Base64 initialization vector.
    pub iv: String,
    /// SHA-256 hash of the ciphertext.
    pub sha256: String,
}

/// A reaction to another event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionContent {
    /// Reaction key (emoji or text).
    pub key: String,
    /// Event ID the reaction targets.
    pub relates_to: String,
}

/// A downloaded audio payload, held in memory for one transcription attempt.
#[derive(Clone)]
pub struct AudioAttachment {
    /// Raw audio bytes.
    pub bytes: Vec<u8>,
    /// MIME type of the payload.
    pub mime_type: String,
}

impl AudioAttachment {
    /// Create an attachment from bytes and a MIME type.
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }
}

impl std::fmt::Debug for AudioAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioAttachment")
            .field("bytes", &format_args!("{} bytes", self.bytes.len()))
            .field("mime_type", &self.mime_type)
            .finish()
    }
}
