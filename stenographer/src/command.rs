//! The `stgr` room command.
//!
//! Three subcommands: `transcribe` (manual transcription of a reply target),
//! `language <code>` (room language override), and `auto <on|off>` (room
//! auto-transcribe override). Only `transcribe`'s reply-target checks produce
//! a user-facing error; everything else fails or ignores silently.

use crate::config::ConfigProvider;
use crate::error::Result;
use crate::events::RoomEvent;
use crate::room::RoomClient;
use crate::router::EventRouter;
use crate::store::PreferenceStore;
use std::sync::Arc;
use tracing::{debug, info};

/// Root command name.
pub const ROOT_COMMAND: &str = "stgr";

const TRANSCRIBE_USAGE: &str =
    "Usage: reply to an audio message with `!stgr transcribe`.";
const TARGET_NOT_AUDIO: &str = "The replied-to message is not an audio message.";

/// A parsed `stgr` subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Transcribe the message this command replies to.
    Transcribe,
    /// Set the room's language override.
    Language(String),
    /// Set the room's auto-transcribe override; the token is kept raw and
    /// checked against the literal `on`/`off` at handling time.
    Auto(String),
}

impl Command {
    /// Parse a message body as a `stgr` command.
    ///
    /// Accepts an optional leading `!` sigil. Returns `None` for anything
    /// that is not a recognized subcommand.
    #[must_use]
    pub fn parse(body: &str) -> Option<Self> {
        let mut words = body.trim().split_whitespace();

        let root = words.next()?;
        if root.strip_prefix('!').unwrap_or(root) != ROOT_COMMAND {
            return None;
        }

        match words.next()? {
            "transcribe" => Some(Self::Transcribe),
            "language" => words.next().map(|code| Self::Language(code.to_owned())),
            "auto" => words.next().map(|token| Self::Auto(token.to_owned())),
            _ => None,
        }
    }
}

/// What handling a command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Transcription ran and the reply was posted.
    Transcribed,
    /// A usage error was posted to the room.
    UsageError,
    /// A preference was stored.
    Stored,
    /// The command was silently ignored.
    Ignored,
}

/// Handles `stgr` commands issued in rooms.
pub struct CommandHandler {
    config: Arc<ConfigProvider>,
    store: Arc<dyn PreferenceStore>,
    router: Arc<EventRouter>,
    client: Arc<dyn RoomClient>,
}

impl std::fmt::Debug for CommandHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHandler").finish_non_exhaustive()
    }
}

impl CommandHandler {
    /// Create a handler over the given collaborators.
    pub fn new(
        config: Arc<ConfigProvider>,
        store: Arc<dyn PreferenceStore>,
        router: Arc<EventRouter>,
        client: Arc<dyn RoomClient>,
    ) -> Self {
        Self {
            config,
            store,
            router,
            client,
        }
    }

    /// Handle a parsed command issued by `event`.
    pub async fn handle(&self, event: &RoomEvent, command: Command) -> Result<CommandOutcome> {
        match command {
            Command::Transcribe => self.handle_transcribe(event).await,
            Command::Language(code) => {
                self.store.set_language(&event.room_id, &code).await?;
                info!(room_id = %event.room_id, language = %code, "language override set");
                Ok(CommandOutcome::Stored)
            }
            Command::Auto(token) => match token.as_str() {
                "on" => {
                    self.store.set_auto(&event.room_id, true).await?;
                    info!(room_id = %event.room_id, "auto-transcribe enabled");
                    Ok(CommandOutcome::Stored)
                }
                "off" => {
                    self.store.set_auto(&event.room_id, false).await?;
                    info!(room_id = %event.room_id, "auto-transcribe disabled");
                    Ok(CommandOutcome::Stored)
                }
                other => {
                    // Unrecognized tokens are ignored without an error reply
                    debug!(room_id = %event.room_id, token = %other, "unrecognized auto token");
                    Ok(CommandOutcome::Ignored)
                }
            },
        }
    }

    async fn handle_transcribe(&self, event: &RoomEvent) -> Result<CommandOutcome> {
        let Some(target_id) = event.as_message().and_then(|m| m.reply_to.as_deref()) else {
            self.client
                .post_reply(&event.room_id, &event.event_id, TRANSCRIBE_USAGE)
                .await?;
            return Ok(CommandOutcome::UsageError);
        };

        let target = self.client.event(&event.room_id, target_id).await?;
        if !target.is_audio() {
            self.client
                .post_reply(&event.room_id, &event.event_id, TARGET_NOT_AUDIO)
                .await?;
            return Ok(CommandOutcome::UsageError);
        }

        let config = self.config.snapshot().await?;
        self.router.transcribe_event(&target, &config).await?;
        Ok(CommandOutcome::Transcribed)
    }
}
