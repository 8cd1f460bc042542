//! OpenAI-compatible Whisper transcription backend.
//!
//! Posts audio as multipart form data to `{base_url}/audio/transcriptions`
//! with bearer-token auth and reads the transcript from the JSON `text`
//! field. Works against OpenAI itself as well as compatible endpoints
//! (Groq, local whisper servers, proxies).

use super::provider::{TranscribeError, TranscribeResult, Transcriber};
use crate::config::{AUTO_LANGUAGE, ConfigProvider};
use crate::events::AudioAttachment;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::sync::Arc;
use tracing::{debug, info};

/// Transcriber backed by an OpenAI-compatible `/audio/transcriptions` API.
///
/// Endpoint, model, and credentials are read from the current configuration
/// snapshot on every request, so config reloads take effect between events
/// without rebuilding the transcriber.
#[derive(Clone)]
pub struct OpenAiTranscriber {
    client: reqwest::Client,
    config: Arc<ConfigProvider>,
}

impl std::fmt::Debug for OpenAiTranscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiTranscriber").finish_non_exhaustive()
    }
}

impl OpenAiTranscriber {
    /// Create a transcriber reading endpoint settings from `config`.
    #[must_use]
    pub fn new(config: Arc<ConfigProvider>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

/// The `language` form field value, or `None` when the API should
/// auto-detect.
fn language_param(language: &str) -> Option<&str> {
    if language == AUTO_LANGUAGE {
        None
    } else {
        Some(language)
    }
}

#[async_trait]
impl Transcriber for OpenAiTranscriber {
    fn name(&self) -> &str {
        "openai-whisper"
    }

    async fn transcribe(
        &self,
        audio: &AudioAttachment,
        language: &str,
    ) -> TranscribeResult<String> {
        if audio.bytes.is_empty() {
            return Err(TranscribeError::Media("empty audio payload".into()));
        }

        let config = self
            .config
            .snapshot()
            .await
            .map_err(|e| TranscribeError::Config(e.to_string()))?;

        let file_part = Part::bytes(audio.bytes.clone())
            .file_name("audio")
            .mime_str(&audio.mime_type)
            .map_err(|e| TranscribeError::Media(format!("bad MIME type: {e}")))?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("model", config.model_name.clone());
        if let Some(lang) = language_param(language) {
            form = form.text("language", lang.to_owned());
        }

        let url = format!(
            "{}/audio/transcriptions",
            config.base_url.trim_end_matches('/')
        );
        debug!(
            url = %url,
            model = %config.model_name,
            language,
            bytes = audio.bytes.len(),
            "sending transcription request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscribeError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscribeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranscribeError::Response(e.to_string()))?;

        let text = json["text"]
            .as_str()
            .ok_or_else(|| TranscribeError::Response("response has no `text` field".into()))?
            .to_owned();

        info!(text_len = text.len(), "transcription complete");
        Ok(text)
    }
}
