//! Event routing: deciding whether an inbound event triggers transcription.
//!
//! The router is stateless across events. Each handling takes one
//! configuration snapshot up front, consults the preference store with
//! fallback to the global defaults, and runs the transcription pipeline:
//! fetch attachment, transcribe, post the text as a threaded reply.
//!
//! Failures past classification are logged and dropped by [`EventRouter::dispatch`];
//! the room is never told about a failed transcription.

use crate::config::{ConfigProvider, GlobalConfig};
use crate::error::{MediaError, Result};
use crate::events::{EventContent, MessageKind, RoomEvent};
use crate::room::{RoomClient, fetch_attachment};
use crate::store::PreferenceStore;
use crate::transcription::Transcriber;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Room override with fallback to the global default.
pub fn resolve<T>(override_value: Option<T>, default: T) -> T {
    override_value.unwrap_or(default)
}

/// What the router did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Event did not trigger transcription.
    Dropped(DropReason),
    /// Transcription ran and the reply was posted.
    Replied,
}

/// Why an event was dropped during classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Event is neither a message nor a reaction.
    OtherEvent,
    /// Message is not an audio message.
    NotAudio,
    /// Auto-transcribe is off for this room.
    AutoDisabled,
    /// No trigger reaction is configured.
    ReactionDisabled,
    /// Reaction key does not match the configured trigger.
    ReactionKeyMismatch,
    /// Reaction targets a non-audio event.
    TargetNotAudio,
}

/// Routes inbound room events to the transcription pipeline.
pub struct EventRouter {
    config: Arc<ConfigProvider>,
    store: Arc<dyn PreferenceStore>,
    transcriber: Arc<dyn Transcriber>,
    client: Arc<dyn RoomClient>,
}

impl std::fmt::Debug for EventRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRouter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl EventRouter {
    /// Create a router over the given collaborators.
    pub fn new(
        config: Arc<ConfigProvider>,
        store: Arc<dyn PreferenceStore>,
        transcriber: Arc<dyn Transcriber>,
        client: Arc<dyn RoomClient>,
    ) -> Self {
        Self {
            config,
            store,
            transcriber,
            client,
        }
    }

    /// Handle one inbound event: classify it and, if it qualifies, run the
    /// transcription pipeline and post the reply.
    pub async fn handle_event(&self, event: &RoomEvent) -> Result<Outcome> {
        // One snapshot per handling; never re-read mid-flight.
        let config = self.config.snapshot().await?;

        match &event.content {
            EventContent::Reaction(reaction) => {
                let Some(trigger) = config.reaction.as_deref() else {
                    return Ok(Outcome::Dropped(DropReason::ReactionDisabled));
                };
                if reaction.key != trigger {
                    return Ok(Outcome::Dropped(DropReason::ReactionKeyMismatch));
                }

                let target = self.client.event(&event.room_id, &reaction.relates_to).await?;
                if !target.is_audio() {
                    return Ok(Outcome::Dropped(DropReason::TargetNotAudio));
                }

                debug!(room_id = %event.room_id, target = %target.event_id, "reaction trigger");
                self.transcribe_event(&target, &config).await?;
                Ok(Outcome::Replied)
            }
            EventContent::Message(message) => {
                if message.kind != MessageKind::Audio {
                    return Ok(Outcome::Dropped(DropReason::NotAudio));
                }

                let auto = resolve(self.store.auto(&event.room_id).await?, config.auto);
                if !auto {
                    return Ok(Outcome::Dropped(DropReason::AutoDisabled));
                }

                self.transcribe_event(event, &config).await?;
                Ok(Outcome::Replied)
            }
            EventContent::Other => Ok(Outcome::Dropped(DropReason::OtherEvent)),
        }
    }

    /// Transcribe an audio message event and post the text as a reply.
    ///
    /// Shared between auto/reaction triggers and the `stgr transcribe`
    /// command, which has already verified the target is audio.
    pub(crate) async fn transcribe_event(
        &self,
        event: &RoomEvent,
        config: &GlobalConfig,
    ) -> Result<()> {
        let message = event.as_message().ok_or(MediaError::Missing)?;
        let attachment = fetch_attachment(self.client.as_ref(), message).await?;

        let language = resolve(
            self.store.language(&event.room_id).await?,
            config.language.clone(),
        );

        let text = self.transcriber.transcribe(&attachment, &language).await?;
        self.client
            .post_reply(&event.room_id, &event.event_id, &text)
            .await?;

        info!(room_id = %event.room_id, event_id = %event.event_id, "transcription posted");
        Ok(())
    }

    /// Entry point for the host's event dispatch.
    ///
    /// Logs failures and returns; no error reply is posted to the room.
    pub async fn dispatch(&self, event: &RoomEvent) {
        match self.handle_event(event).await {
            Ok(Outcome::Replied) => {}
            Ok(Outcome::Dropped(reason)) => {
                debug!(event_id = %event.event_id, ?reason, "event dropped");
            }
            Err(e) => {
                error!(event_id = %event.event_id, error = %e, "event handling failed");
            }
        }
    }
}
