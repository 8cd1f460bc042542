//! Audio transcription module.
//!
//! Defines the [`Transcriber`] seam and the OpenAI-compatible HTTP backend
//! used against any `/audio/transcriptions` endpoint.

mod openai;
mod provider;

pub use openai::OpenAiTranscriber;
pub use provider::{AudioFormat, TranscribeError, TranscribeResult, Transcriber};
