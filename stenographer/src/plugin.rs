//! Plugin lifecycle and top-level event entry point.
//!
//! [`Stenographer`] wires the router and command handler over explicitly
//! passed dependencies; there are no ambient singletons. The host constructs
//! it once at startup via [`Stenographer::initialize`], feeds every inbound
//! room event to [`Stenographer::dispatch`], and drops it via
//! [`Stenographer::shutdown`] on teardown.

use crate::command::{Command, CommandHandler, CommandOutcome};
use crate::config::ConfigProvider;
use crate::error::Result;
use crate::events::{MessageKind, RoomEvent};
use crate::room::RoomClient;
use crate::router::{EventRouter, Outcome};
use crate::store::PreferenceStore;
use crate::transcription::Transcriber;
use std::sync::Arc;
use tracing::{debug, error, info};

/// What the plugin did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// Event went through the router.
    Routed(Outcome),
    /// Event was a `stgr` command.
    Command(CommandOutcome),
}

/// The assembled plugin.
pub struct Stenographer {
    config: Arc<ConfigProvider>,
    router: Arc<EventRouter>,
    commands: CommandHandler,
}

impl std::fmt::Debug for Stenographer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stenographer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Stenographer {
    /// Wire the plugin and ensure the configuration is loaded.
    ///
    /// Fails if no configuration can be loaded; no event is ever processed
    /// against an unloaded config.
    pub async fn initialize(
        config: Arc<ConfigProvider>,
        store: Arc<dyn PreferenceStore>,
        transcriber: Arc<dyn Transcriber>,
        client: Arc<dyn RoomClient>,
    ) -> Result<Self> {
        config.on_reload(|| info!("configuration reloaded"));
        if !config.is_loaded().await {
            config.load().await?;
        }

        let router = Arc::new(EventRouter::new(
            Arc::clone(&config),
            Arc::clone(&store),
            transcriber,
            Arc::clone(&client),
        ));
        let commands = CommandHandler::new(
            Arc::clone(&config),
            store,
            Arc::clone(&router),
            client,
        );

        info!("stenographer initialized");
        Ok(Self {
            config,
            router,
            commands,
        })
    }

    /// The configuration provider, e.g. for triggering reloads.
    #[must_use]
    pub fn config(&self) -> &Arc<ConfigProvider> {
        &self.config
    }

    /// Handle one inbound event.
    ///
    /// Text messages that parse as a `stgr` command go to the command
    /// handler; everything else goes through the router's classification.
    pub async fn handle_event(&self, event: &RoomEvent) -> Result<Handled> {
        if let Some(message) = event.as_message()
            && message.kind == MessageKind::Text
            && let Some(command) = Command::parse(&message.body)
        {
            let outcome = self.commands.handle(event, command).await?;
            return Ok(Handled::Command(outcome));
        }

        let outcome = self.router.handle_event(event).await?;
        Ok(Handled::Routed(outcome))
    }

    /// Entry point for the host's event dispatch; logs and swallows failures.
    pub async fn dispatch(&self, event: &RoomEvent) {
        match self.handle_event(event).await {
            Ok(handled) => debug!(event_id = %event.event_id, ?handled, "event handled"),
            Err(e) => error!(event_id = %event.event_id, error = %e, "event handling failed"),
        }
    }

    /// Tear the plugin down.
    ///
    /// All state is owned; dropping releases it.
    pub fn shutdown(self) {
        info!("stenographer shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{MediaSource, MessageContent};
    use crate::router::DropReason;
    use crate::store::MemoryStore;
    use crate::test_util::{
        DEFAULT_CONFIG, MockRoomClient, RecordingTranscriber, loaded_provider,
    };

    struct Fixture {
        plugin: Stenographer,
        transcriber: Arc<RecordingTranscriber>,
        client: Arc<MockRoomClient>,
    }

    async fn fixture(name: &str) -> Fixture {
        let provider = loaded_provider(name, DEFAULT_CONFIG).await;
        let store = Arc::new(MemoryStore::new());
        let transcriber = Arc::new(RecordingTranscriber::succeeding("words"));
        let client = Arc::new(
            MockRoomClient::new().with_media("mxc://example/voice", vec![1, 2, 3]),
        );

        let plugin = Stenographer::initialize(
            provider,
            store,
            Arc::clone(&transcriber) as Arc<dyn Transcriber>,
            Arc::clone(&client) as Arc<dyn RoomClient>,
        )
        .await
        .unwrap();

        Fixture {
            plugin,
            transcriber,
            client,
        }
    }

    fn audio_event(event_id: &str) -> RoomEvent {
        RoomEvent::message(
            event_id,
            "!room",
            "@alice",
            MessageContent::audio(
                "voice.ogg",
                MediaSource::Plain {
                    url: "mxc://example/voice".into(),
                },
            )
            .with_mime_type("audio/ogg"),
        )
    }

    #[tokio::test]
    async fn test_command_message_goes_to_command_handler() {
        let f = fixture("plugin-cmd").await;
        let event = RoomEvent::message(
            "$cmd",
            "!room",
            "@bob",
            MessageContent::text("!stgr language fr"),
        );

        let handled = f.plugin.handle_event(&event).await.unwrap();
        assert_eq!(handled, Handled::Command(CommandOutcome::Stored));
    }

    #[tokio::test]
    async fn test_language_override_then_audio_message() {
        let f = fixture("plugin-lang").await;

        let cmd = RoomEvent::message(
            "$cmd",
            "!room",
            "@bob",
            MessageContent::text("!stgr language fr"),
        );
        f.plugin.handle_event(&cmd).await.unwrap();

        let handled = f.plugin.handle_event(&audio_event("$1")).await.unwrap();
        assert_eq!(handled, Handled::Routed(Outcome::Replied));
        // Override wins over the global "auto" default
        assert_eq!(f.transcriber.languages(), vec!["fr"]);
    }

    #[tokio::test]
    async fn test_plain_text_goes_to_router() {
        let f = fixture("plugin-text").await;
        let event = RoomEvent::message("$1", "!room", "@alice", MessageContent::text("hello"));

        let handled = f.plugin.handle_event(&event).await.unwrap();
        assert_eq!(
            handled,
            Handled::Routed(Outcome::Dropped(DropReason::NotAudio))
        );
        assert_eq!(f.client.reply_count(), 0);
    }

    #[tokio::test]
    async fn test_auto_off_command_then_audio_message() {
        let f = fixture("plugin-auto").await;

        let cmd = RoomEvent::message(
            "$cmd",
            "!room",
            "@bob",
            MessageContent::text("!stgr auto off"),
        );
        f.plugin.handle_event(&cmd).await.unwrap();

        let handled = f.plugin.handle_event(&audio_event("$1")).await.unwrap();
        assert_eq!(
            handled,
            Handled::Routed(Outcome::Dropped(DropReason::AutoDisabled))
        );
        assert_eq!(f.transcriber.call_count(), 0);
    }

    #[tokio::test]
    async fn test_initialize_fails_without_config() {
        let provider = Arc::new(ConfigProvider::new("/nonexistent/config.json"));
        let result = Stenographer::initialize(
            provider,
            Arc::new(MemoryStore::new()),
            Arc::new(RecordingTranscriber::succeeding("x")),
            Arc::new(MockRoomClient::new()),
        )
        .await;
        assert!(result.is_err());
    }
}
