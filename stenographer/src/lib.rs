//! Stenographer - a chat-room plugin that transcribes voice messages.
//!
//! The plugin listens for audio messages, downloads the (possibly encrypted)
//! attachment through the host chat SDK, sends it to an OpenAI-compatible
//! speech-to-text API, and posts the transcription back as a threaded reply.
//! Per-room overrides (language, auto-transcribe) persist in a small SQLite
//! store; transcription can also be triggered manually with the `stgr`
//! command or a configured emoji reaction.
//!
//! # Architecture
//!
//! - **Events** ([`events`]) - inbound room event model and audio attachments
//! - **Router** ([`router`]) - classifies events and runs the transcription
//!   pipeline
//! - **Commands** ([`command`]) - the `stgr` room command
//! - **Store** ([`store`]) - per-room preference persistence
//! - **Config** ([`config`]) - global defaults with reload notification
//! - **Transcription** ([`transcription`]) - the speech-to-text backend seam
//! - **Room client** ([`room`]) - the host chat SDK seam
//! - **Plugin** ([`plugin`]) - lifecycle and top-level dispatch
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use stenographer::prelude::*;
//! use std::sync::Arc;
//!
//! let config = Arc::new(ConfigProvider::new(config_path()));
//! let store = Arc::new(SqliteStore::open(store_path())?);
//! let transcriber = Arc::new(OpenAiTranscriber::new(Arc::clone(&config)));
//! let plugin = Stenographer::initialize(config, store, transcriber, client).await?;
//! // feed events from the host SDK:
//! plugin.dispatch(&event).await;
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod events;
pub mod plugin;
pub mod room;
pub mod router;
pub mod store;
pub mod transcription;

#[cfg(test)]
pub(crate) mod test_util;

/// Prelude module for convenient imports.
pub mod prelude {
    // Error types (centralized)
    pub use crate::error::{
        ClientError, ClientResult, ConfigError, ConfigResult, MediaError, MediaResult,
        PluginError, Result, StorageError, StorageResult,
    };

    // Config
    pub use crate::config::{AUTO_LANGUAGE, ConfigProvider, GlobalConfig, config_path};

    // Events
    pub use crate::events::{
        AudioAttachment, EncryptedFile, EventContent, MediaSource, MessageContent, MessageKind,
        ReactionContent, RoomEvent,
    };

    // Room client seam
    pub use crate::room::{RoomClient, fetch_attachment};

    // Store
    pub use crate::store::{MemoryStore, PreferenceStore, SqliteStore, store_path};

    // Transcription
    pub use crate::transcription::{
        AudioFormat, OpenAiTranscriber, TranscribeError, TranscribeResult, Transcriber,
    };

    // Router and commands
    pub use crate::command::{Command, CommandHandler, CommandOutcome, ROOT_COMMAND};
    pub use crate::router::{DropReason, EventRouter, Outcome, resolve};

    // Plugin lifecycle
    pub use crate::plugin::{Handled, Stenographer};
}
