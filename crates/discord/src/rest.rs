use async_trait::async_trait;
use bot_core::{
    Acknowledgement, ChatPlatform, CommandSpec, InteractionRef, MessageRef, OutgoingMessage,
    PlatformError,
};
use reqwest::{header, Client, Method, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::wire::{
    ApplicationCommand, InteractionCallback, MessageBody, CALLBACK_CHANNEL_MESSAGE,
    CALLBACK_DEFERRED_CHANNEL_MESSAGE, CALLBACK_DEFERRED_UPDATE_MESSAGE, CALLBACK_UPDATE_MESSAGE,
};

pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";
const ORIGINAL_MESSAGE: &str = "@original";

#[derive(Debug, Deserialize)]
struct CreatedMessage {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Application {
    id: String,
}

/// Discord REST adapter: interaction callbacks, webhook follow-ups and
/// command registration, all authorised with the bot token.
#[derive(Clone)]
pub struct DiscordRest {
    http: Client,
    api_base: String,
    token: String,
}

impl DiscordRest {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_base(DEFAULT_API_BASE, token)
    }

    pub fn with_api_base(api_base: impl Into<String>, token: impl Into<String>) -> Self {
        let http = Client::builder()
            .user_agent(concat!(
                "DiscordBot (https://flavortown.hackclub.com, ",
                env!("CARGO_PKG_VERSION"),
                ")"
            ))
            .build()
            .unwrap_or_else(|err| {
                warn!(%err, "discord: falling back to default http client");
                Client::new()
            });
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Value, PlatformError>
    where
        B: Serialize + ?Sized,
    {
        debug!(%method, path, "discord: request");
        let mut builder = self
            .http
            .request(method, format!("{}{path}", self.api_base))
            .header(header::AUTHORIZATION, format!("Bot {}", self.token));
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = builder.send().await.map_err(transport_error)?;
        read_response(response).await
    }

    async fn callback(
        &self,
        interaction: &InteractionRef,
        callback: &InteractionCallback,
    ) -> Result<(), PlatformError> {
        let path = format!(
            "/interactions/{}/{}/callback",
            interaction.id, interaction.token
        );
        self.send(Method::POST, &path, Some(callback)).await?;
        Ok(())
    }

    /// The application id behind the bot token.
    pub async fn application_id(&self) -> Result<String, PlatformError> {
        let value = self
            .send::<()>(Method::GET, "/applications/@me", None)
            .await?;
        let application: Application = serde_json::from_value(value)
            .map_err(|err| PlatformError::Decode(err.to_string()))?;
        Ok(application.id)
    }

    /// Replaces the registered slash commands, globally or for one guild.
    /// Returns how many commands the platform now holds.
    pub async fn register_commands(
        &self,
        application_id: &str,
        guild_id: Option<&str>,
        commands: &[CommandSpec],
    ) -> Result<usize, PlatformError> {
        let path = match guild_id {
            Some(guild_id) => format!("/applications/{application_id}/guilds/{guild_id}/commands"),
            None => format!("/applications/{application_id}/commands"),
        };
        let payload: Vec<ApplicationCommand> =
            commands.iter().map(ApplicationCommand::from).collect();
        let registered = self.send(Method::PUT, &path, Some(&payload)).await?;
        Ok(registered.as_array().map_or(0, Vec::len))
    }
}

fn webhook_path(interaction: &InteractionRef) -> String {
    format!(
        "/webhooks/{}/{}",
        interaction.application_id, interaction.token
    )
}

fn message_path(target: &MessageRef) -> String {
    match target {
        MessageRef::Original(interaction) => {
            format!("{}/messages/{ORIGINAL_MESSAGE}", webhook_path(interaction))
        }
        MessageRef::Followup {
            interaction,
            message_id,
        } => format!("{}/messages/{message_id}", webhook_path(interaction)),
    }
}

fn transport_error(err: reqwest::Error) -> PlatformError {
    PlatformError::Transport(err.to_string())
}

async fn read_response(response: Response) -> Result<Value, PlatformError> {
    let status = response.status();
    match status {
        StatusCode::NOT_FOUND => return Err(PlatformError::NotFound),
        StatusCode::FORBIDDEN => return Err(PlatformError::Forbidden),
        _ => {}
    }

    let body = response.bytes().await.map_err(transport_error)?;
    if status.is_client_error() || status.is_server_error() {
        return Err(PlatformError::Http {
            status: status.as_u16(),
            message: String::from_utf8_lossy(&body).into_owned(),
        });
    }
    if body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&body).map_err(|err| PlatformError::Decode(err.to_string()))
}

#[async_trait]
impl ChatPlatform for DiscordRest {
    async fn acknowledge(
        &self,
        interaction: &InteractionRef,
        ack: Acknowledgement,
    ) -> Result<(), PlatformError> {
        let kind = match ack {
            Acknowledgement::DeferredMessage => CALLBACK_DEFERRED_CHANNEL_MESSAGE,
            Acknowledgement::DeferredUpdate => CALLBACK_DEFERRED_UPDATE_MESSAGE,
        };
        self.callback(interaction, &InteractionCallback::empty(kind))
            .await
    }

    async fn respond(
        &self,
        interaction: &InteractionRef,
        message: &OutgoingMessage,
    ) -> Result<MessageRef, PlatformError> {
        let callback = InteractionCallback::message(CALLBACK_CHANNEL_MESSAGE, message);
        self.callback(interaction, &callback).await?;
        Ok(MessageRef::Original(interaction.clone()))
    }

    async fn update(
        &self,
        interaction: &InteractionRef,
        message: &OutgoingMessage,
    ) -> Result<(), PlatformError> {
        let callback = InteractionCallback::message(CALLBACK_UPDATE_MESSAGE, message);
        self.callback(interaction, &callback).await
    }

    async fn followup(
        &self,
        interaction: &InteractionRef,
        message: &OutgoingMessage,
    ) -> Result<MessageRef, PlatformError> {
        let path = format!("{}?wait=true", webhook_path(interaction));
        let created = self
            .send(Method::POST, &path, Some(&MessageBody::from(message)))
            .await?;
        let created: CreatedMessage = serde_json::from_value(created)
            .map_err(|err| PlatformError::Decode(err.to_string()))?;
        Ok(MessageRef::Followup {
            interaction: interaction.clone(),
            message_id: created.id,
        })
    }

    async fn edit(
        &self,
        target: &MessageRef,
        message: &OutgoingMessage,
    ) -> Result<(), PlatformError> {
        let mut body = MessageBody::from(message);
        // Visibility is fixed when a message is created.
        body.flags = None;
        self.send(Method::PATCH, &message_path(target), Some(&body))
            .await?;
        Ok(())
    }

    async fn delete(&self, target: &MessageRef) -> Result<(), PlatformError> {
        self.send::<()>(Method::DELETE, &message_path(target), None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/rest_tests.rs"]
mod tests;
