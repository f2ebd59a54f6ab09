use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::card::OutgoingMessage;

pub const DEFAULT_RETIRE_AFTER: Duration = Duration::from_secs(60);

/// Handle on one invocation (slash command or button press) as the platform
/// delivered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionRef {
    pub id: String,
    pub application_id: String,
    pub token: String,
}

/// A delivered message that can later be edited or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageRef {
    /// The invocation's own response message.
    Original(InteractionRef),
    Followup {
        interaction: InteractionRef,
        message_id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgement {
    /// Promise a new message later (slash commands).
    DeferredMessage,
    /// Promise to edit the message the pressed control belongs to.
    DeferredUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("message not found")]
    NotFound,
    #[error("missing permission")]
    Forbidden,
    #[error("platform rejected request with status {status}: {message}")]
    Http { status: u16, message: String },
    #[error("platform request failed: {0}")]
    Transport(String),
    #[error("unexpected platform response: {0}")]
    Decode(String),
}

/// The three capabilities the bot needs from the chat platform: answer an
/// invocation (now or deferred), edit a delivered message, delete it.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    async fn acknowledge(
        &self,
        interaction: &InteractionRef,
        ack: Acknowledgement,
    ) -> Result<(), PlatformError>;
    async fn respond(
        &self,
        interaction: &InteractionRef,
        message: &OutgoingMessage,
    ) -> Result<MessageRef, PlatformError>;
    /// Immediate in-place update of the message a control belongs to.
    async fn update(
        &self,
        interaction: &InteractionRef,
        message: &OutgoingMessage,
    ) -> Result<(), PlatformError>;
    async fn followup(
        &self,
        interaction: &InteractionRef,
        message: &OutgoingMessage,
    ) -> Result<MessageRef, PlatformError>;
    async fn edit(&self, target: &MessageRef, message: &OutgoingMessage)
        -> Result<(), PlatformError>;
    async fn delete(&self, target: &MessageRef) -> Result<(), PlatformError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Pending,
    Deferred,
    Responded,
    Retired,
}

/// Drives one invocation from acknowledgment to delivery, and schedules the
/// removal of public replies.
pub struct InteractionLifecycle {
    platform: Arc<dyn ChatPlatform>,
    interaction: InteractionRef,
    retire_after: Duration,
    state: InteractionState,
    retirements: Vec<JoinHandle<()>>,
}

impl InteractionLifecycle {
    pub fn new(
        platform: Arc<dyn ChatPlatform>,
        interaction: InteractionRef,
        retire_after: Duration,
    ) -> Self {
        Self {
            platform,
            interaction,
            retire_after,
            state: InteractionState::Pending,
            retirements: Vec::new(),
        }
    }

    pub fn state(&self) -> InteractionState {
        if self.state == InteractionState::Responded
            && !self.retirements.is_empty()
            && self.retirements.iter().all(JoinHandle::is_finished)
        {
            return InteractionState::Retired;
        }
        self.state
    }

    pub async fn defer(&mut self) -> Result<(), PlatformError> {
        self.acknowledge(Acknowledgement::DeferredMessage).await
    }

    pub async fn defer_update(&mut self) -> Result<(), PlatformError> {
        self.acknowledge(Acknowledgement::DeferredUpdate).await
    }

    async fn acknowledge(&mut self, ack: Acknowledgement) -> Result<(), PlatformError> {
        if self.state != InteractionState::Pending {
            return Ok(());
        }
        self.platform.acknowledge(&self.interaction, ack).await?;
        self.state = InteractionState::Deferred;
        Ok(())
    }

    /// Delivers `message`. Private messages are only visible to the invoker
    /// and expire on their own; public ones are deleted after the retirement
    /// delay.
    pub async fn send(
        &mut self,
        message: OutgoingMessage,
        private: bool,
    ) -> Result<MessageRef, PlatformError> {
        let message = if private { message.ephemeral() } else { message };
        let delivered = if self.state == InteractionState::Pending {
            self.platform.respond(&self.interaction, &message).await?
        } else {
            self.platform.followup(&self.interaction, &message).await?
        };
        self.state = InteractionState::Responded;

        if !private {
            self.retirements.push(schedule_retirement(
                Arc::clone(&self.platform),
                delivered.clone(),
                self.retire_after,
            ));
        }
        Ok(delivered)
    }

    /// Re-renders the message the pressed control belongs to. The message
    /// keeps whatever retirement timer its first delivery started.
    pub async fn update(&mut self, message: OutgoingMessage) -> Result<(), PlatformError> {
        if self.state == InteractionState::Pending {
            self.platform.update(&self.interaction, &message).await?;
        } else {
            let target = MessageRef::Original(self.interaction.clone());
            self.platform.edit(&target, &message).await?;
        }
        self.state = InteractionState::Responded;
        Ok(())
    }
}

/// Deletes `message` after `delay` on a detached task. A message that is
/// already gone or that the bot may not delete is left alone silently.
pub fn schedule_retirement(
    platform: Arc<dyn ChatPlatform>,
    message: MessageRef,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        match platform.delete(&message).await {
            Ok(()) => debug!(?message, "lifecycle: retired message"),
            Err(PlatformError::NotFound | PlatformError::Forbidden) => {
                debug!(?message, "lifecycle: message already gone or not deletable")
            }
            Err(err) => warn!(?message, %err, "lifecycle: failed to retire message"),
        }
    })
}

#[cfg(test)]
#[path = "tests/lifecycle_tests.rs"]
mod tests;
