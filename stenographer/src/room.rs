//! Chat client seam.
//!
//! The plugin never talks to the chat protocol directly. The host SDK
//! implements [`RoomClient`]; media decryption in particular stays inside the
//! host's crypto layer, keyed by the material embedded in the message.

use crate::error::{ClientResult, MediaError, MediaResult};
use crate::events::{AudioAttachment, EncryptedFile, MediaSource, MessageContent, RoomEvent};
use async_trait::async_trait;

/// Fallback MIME type when the message does not declare one.
const OCTET_STREAM: &str = "application/octet-stream";

/// Trait implemented by the host chat SDK.
#[async_trait]
pub trait RoomClient: Send + Sync {
    /// Download unencrypted media by its content URL.
    async fn download_media(&self, url: &str) -> MediaResult<Vec<u8>>;

    /// Download and decrypt encrypted media.
    ///
    /// Decryption uses the key, IV, and hash carried by the message and is
    /// delegated to the SDK's crypto layer.
    async fn download_encrypted_media(&self, file: &EncryptedFile) -> MediaResult<Vec<u8>>;

    /// Fetch an event by ID, e.g. a reaction target or a reply target.
    async fn event(&self, room_id: &str, event_id: &str) -> ClientResult<RoomEvent>;

    /// Post a threaded reply to an event.
    async fn post_reply(&self, room_id: &str, in_reply_to: &str, body: &str) -> ClientResult<()>;
}

/// Obtain the audio payload for a media message.
///
/// Prefers the plain URL; falls back to the encrypted file reference. A
/// message with neither is a [`MediaError::Missing`], an empty download a
/// [`MediaError::Empty`].
pub async fn fetch_attachment(
    client: &dyn RoomClient,
    content: &MessageContent,
) -> MediaResult<AudioAttachment> {
    let bytes = match &content.media {
        Some(MediaSource::Plain { url }) => client.download_media(url).await?,
        Some(MediaSource::Encrypted(file)) => client.download_encrypted_media(file).await?,
        None => return Err(MediaError::Missing),
    };

    if bytes.is_empty() {
        return Err(MediaError::Empty);
    }

    let mime_type = content.mime_type.as_deref().unwrap_or(OCTET_STREAM);
    Ok(AudioAttachment::new(bytes, mime_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;

    /// Client stub that serves fixed bytes for either download path.
    struct StubClient {
        plain: Vec<u8>,
        encrypted: Vec<u8>,
    }

    #[async_trait]
    impl RoomClient for StubClient {
        async fn download_media(&self, _url: &str) -> MediaResult<Vec<u8>> {
            Ok(self.plain.clone())
        }

        async fn download_encrypted_media(&self, _file: &EncryptedFile) -> MediaResult<Vec<u8>> {
            Ok(self.encrypted.clone())
        }

        async fn event(&self, _room_id: &str, event_id: &str) -> ClientResult<RoomEvent> {
            Err(ClientError::EventNotFound(event_id.to_owned()))
        }

        async fn post_reply(
            &self,
            _room_id: &str,
            _in_reply_to: &str,
            _body: &str,
        ) -> ClientResult<()> {
            Ok(())
        }
    }

    fn encrypted_file() -> EncryptedFile {
        EncryptedFile {
            url: "mxc://example/enc".into(),
            key: "a2V5".into(),
            iv: "aXY=".into(),
            sha256: "aGFzaA==".into(),
        }
    }

    #[tokio::test]
    async fn test_plain_media() {
        let client = StubClient {
            plain: vec![1, 2, 3],
            encrypted: vec![],
        };
        let content = MessageContent::audio(
            "voice.ogg",
            MediaSource::Plain {
                url: "mxc://example/abc".into(),
            },
        )
        .with_mime_type("audio/ogg");

        let attachment = fetch_attachment(&client, &content).await.unwrap();
        assert_eq!(attachment.bytes, vec![1, 2, 3]);
        assert_eq!(attachment.mime_type, "audio/ogg");
    }

    #[tokio::test]
    async fn test_encrypted_media() {
        let client = StubClient {
            plain: vec![],
            encrypted: vec![9, 9],
        };
        let content =
            MessageContent::audio("voice.ogg", MediaSource::Encrypted(encrypted_file()));

        let attachment = fetch_attachment(&client, &content).await.unwrap();
        assert_eq!(attachment.bytes, vec![9, 9]);
        // No declared MIME type falls back to octet-stream
        assert_eq!(attachment.mime_type, OCTET_STREAM);
    }

    #[tokio::test]
    async fn test_missing_media_reference() {
        let client = StubClient {
            plain: vec![],
            encrypted: vec![],
        };
        let content = MessageContent::text("not audio");

        let err = fetch_attachment(&client, &content).await.unwrap_err();
        assert!(matches!(err, MediaError::Missing));
    }

    #[tokio::test]
    async fn test_empty_download() {
        let client = StubClient {
            plain: vec![],
            encrypted: vec![],
        };
        let content = MessageContent::audio(
            "voice.ogg",
            MediaSource::Plain {
                url: "mxc://example/empty".into(),
            },
        );

        let err = fetch_attachment(&client, &content).await.unwrap_err();
        assert!(matches!(err, MediaError::Empty));
    }
}
