use std::sync::Arc;

use bot_core::{handle_command, handle_component, reject_invocation, AppContext, COMMANDS};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    gateway::GatewayHandler,
    interaction::{self, Incoming},
    rest::DiscordRest,
};

/// Bridges gateway events to the bot: registers commands once the session is
/// ready and answers each interaction on its own task.
pub struct InteractionDispatcher {
    ctx: AppContext,
    rest: Arc<DiscordRest>,
    guild_id: Option<String>,
}

impl InteractionDispatcher {
    pub fn new(ctx: AppContext, rest: Arc<DiscordRest>, guild_id: Option<String>) -> Self {
        Self {
            ctx,
            rest,
            guild_id,
        }
    }
}

impl GatewayHandler for InteractionDispatcher {
    fn ready(&self, application_id: &str) {
        let rest = Arc::clone(&self.rest);
        let application_id = application_id.to_string();
        let guild_id = self.guild_id.clone();
        tokio::spawn(async move {
            match rest
                .register_commands(&application_id, guild_id.as_deref(), COMMANDS)
                .await
            {
                Ok(count) => info!(count, guild_id = ?guild_id, "discord: synced commands"),
                Err(err) => warn!(%err, "discord: failed to sync commands"),
            }
        });
    }

    fn interaction(&self, payload: Value) {
        let reference = interaction::reference(&payload);
        let incoming = match interaction::decode(payload) {
            Ok(incoming) => incoming,
            Err(err) => {
                warn!(%err, "discord: undecodable interaction");
                if let Some(reference) = reference.filter(|_| err.answerable()) {
                    let ctx = self.ctx.clone();
                    let reason = err.to_string();
                    tokio::spawn(async move {
                        reject_invocation(&ctx, reference, &reason).await;
                    });
                }
                return;
            }
        };
        let ctx = self.ctx.clone();
        tokio::spawn(async move {
            match incoming {
                Incoming::Command(interaction, command) => {
                    handle_command(&ctx, interaction, command).await
                }
                Incoming::Component(interaction, custom_id) => {
                    handle_component(&ctx, interaction, &custom_id).await
                }
            }
        });
    }
}
