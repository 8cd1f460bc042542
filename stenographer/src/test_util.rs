//! Shared test doubles: a recording transcriber and a scripted room client.

use crate::error::{ClientError, ClientResult, MediaError, MediaResult};
use crate::events::{AudioAttachment, EncryptedFile, RoomEvent};
use crate::room::RoomClient;
use crate::transcription::{TranscribeError, TranscribeResult, Transcriber};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// What the recording transcriber should do when called.
pub enum TranscribeBehavior {
    /// Succeed with the given text.
    Text(String),
    /// Fail with an API error.
    Api(u16, String),
    /// Fail with a network error.
    Network(String),
}

/// One recorded transcription call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub language: String,
    pub mime_type: String,
    pub byte_len: usize,
}

/// Transcriber double that records every call and replays a scripted result.
pub struct RecordingTranscriber {
    behavior: TranscribeBehavior,
    pub calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingTranscriber {
    pub fn succeeding(text: impl Into<String>) -> Self {
        Self::with_behavior(TranscribeBehavior::Text(text.into()))
    }

    pub fn with_behavior(behavior: TranscribeBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn languages(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.language.clone())
            .collect()
    }
}

#[async_trait]
impl Transcriber for RecordingTranscriber {
    fn name(&self) -> &str {
        "recording"
    }

    async fn transcribe(
        &self,
        audio: &AudioAttachment,
        language: &str,
    ) -> TranscribeResult<String> {
        self.calls.lock().unwrap().push(RecordedCall {
            language: language.to_owned(),
            mime_type: audio.mime_type.clone(),
            byte_len: audio.bytes.len(),
        });

        match &self.behavior {
            TranscribeBehavior::Text(text) => Ok(text.clone()),
            TranscribeBehavior::Api(status, body) => Err(TranscribeError::Api {
                status: *status,
                body: body.clone(),
            }),
            TranscribeBehavior::Network(msg) => Err(TranscribeError::Network(msg.clone())),
        }
    }
}

/// Room client double serving scripted media and events, recording replies.
#[derive(Default)]
pub struct MockRoomClient {
    media: HashMap<String, Vec<u8>>,
    encrypted: HashMap<String, Vec<u8>>,
    events: HashMap<String, RoomEvent>,
    pub replies: Mutex<Vec<(String, String, String)>>,
}

impl MockRoomClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_media(mut self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.media.insert(url.into(), bytes);
        self
    }

    pub fn with_encrypted_media(mut self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.encrypted.insert(url.into(), bytes);
        self
    }

    pub fn with_event(mut self, event: RoomEvent) -> Self {
        self.events.insert(event.event_id.clone(), event);
        self
    }

    pub fn reply_count(&self) -> usize {
        self.replies.lock().unwrap().len()
    }

    pub fn last_reply(&self) -> Option<(String, String, String)> {
        self.replies.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl RoomClient for MockRoomClient {
    async fn download_media(&self, url: &str) -> MediaResult<Vec<u8>> {
        self.media
            .get(url)
            .cloned()
            .ok_or_else(|| MediaError::Download(format!("unknown url: {url}")))
    }

    async fn download_encrypted_media(&self, file: &EncryptedFile) -> MediaResult<Vec<u8>> {
        self.encrypted
            .get(&file.url)
            .cloned()
            .ok_or_else(|| MediaError::Decrypt(format!("unknown url: {}", file.url)))
    }

    async fn event(&self, _room_id: &str, event_id: &str) -> ClientResult<RoomEvent> {
        self.events
            .get(event_id)
            .cloned()
            .ok_or_else(|| ClientError::EventNotFound(event_id.to_owned()))
    }

    async fn post_reply(&self, room_id: &str, in_reply_to: &str, body: &str) -> ClientResult<()> {
        self.replies.lock().unwrap().push((
            room_id.to_owned(),
            in_reply_to.to_owned(),
            body.to_owned(),
        ));
        Ok(())
    }
}

/// Write a config file into the temp dir and return a loaded provider.
pub async fn loaded_provider(name: &str, content: &str) -> std::sync::Arc<crate::config::ConfigProvider> {
    let path = std::env::temp_dir().join(format!("stgr-test-{}-{name}.json", std::process::id()));
    tokio::fs::write(&path, content).await.unwrap();
    let provider = std::sync::Arc::new(crate::config::ConfigProvider::new(&path));
    provider.load().await.unwrap();
    provider
}

/// A config with reaction "🗒️", language "auto", auto-transcribe default on.
pub const DEFAULT_CONFIG: &str = r#"{
    "base_url": "https://api.example.com/v1",
    "model_name": "whisper-1",
    "api_key": "sk-test",
    "language": "auto",
    "reaction": "🗒️",
    "auto": true
}"#;

/// Same endpoint but auto-transcribe off and no reaction trigger.
pub const MANUAL_CONFIG: &str = r#"{
    "base_url": "https://api.example.com/v1",
    "model_name": "whisper-1",
    "api_key": "sk-test",
    "language": "en"
}"#;
