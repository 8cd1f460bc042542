//! Transcription provider trait and common types.

use crate::events::AudioAttachment;
use async_trait::async_trait;

/// Error type for transcription operations.
///
/// A single attempt is made per request; every failure surfaces immediately
/// to the caller, which decides whether the room hears about it.
#[derive(Debug, thiserror::Error)]
pub enum TranscribeError {
    /// Audio payload is empty or unreadable.
    #[error("media: {0}")]
    Media(String),

    /// Transport-level failure before an HTTP status was received.
    #[error("network: {0}")]
    Network(String),

    /// Non-success response from the remote endpoint.
    #[error("API error: HTTP {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned by the endpoint.
        body: String,
    },

    /// Response arrived but could not be understood.
    #[error("bad response: {0}")]
    Response(String),

    /// Backend configuration is unavailable or unusable.
    #[error("config: {0}")]
    Config(String),
}

/// Result type for transcription operations.
pub type TranscribeResult<T> = std::result::Result<T, TranscribeError>;

/// Trait for audio transcription backends.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Get the backend name.
    fn name(&self) -> &str;

    /// Transcribe an audio attachment in the given language.
    ///
    /// A `language` of `"auto"` lets the backend auto-detect; any other value
    /// is passed through verbatim, without validation.
    async fn transcribe(
        &self,
        audio: &AudioAttachment,
        language: &str,
    ) -> TranscribeResult<String>;
}

/// Supported audio formats for the local-file CLI path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// MP3 audio.
    Mp3,
    /// MP4/M4A audio.
    Mp4,
    /// OGG audio (the usual voice-message container).
    Ogg,
    /// WAV audio.
    Wav,
    /// WebM audio.
    Webm,
    /// FLAC audio.
    Flac,
}

impl AudioFormat {
    /// Detect format from a file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp3" | "mpeg" | "mpga" => Some(Self::Mp3),
            "mp4" | "m4a" => Some(Self::Mp4),
            "ogg" | "oga" | "opus" => Some(Self::Ogg),
            "wav" => Some(Self::Wav),
            "webm" => Some(Self::Webm),
            "flac" => Some(Self::Flac),
            _ => None,
        }
    }

    /// The MIME type for this format.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Mp4 => "audio/mp4",
            Self::Ogg => "audio/ogg",
            Self::Wav => "audio/wav",
            Self::Webm => "audio/webm",
            Self::Flac => "audio/flac",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_format_detection() {
        assert_eq!(AudioFormat::from_extension("ogg"), Some(AudioFormat::Ogg));
        assert_eq!(AudioFormat::from_extension("OPUS"), Some(AudioFormat::Ogg));
        assert_eq!(AudioFormat::from_extension("mp3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_extension("wav"), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::from_extension("xyz"), None);
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(AudioFormat::Ogg.mime_type(), "audio/ogg");
        assert_eq!(AudioFormat::Mp3.mime_type(), "audio/mpeg");
    }
}
