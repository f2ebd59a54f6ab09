use std::collections::HashMap;

use bot_core::{Command, CommandError, InteractionRef, OptionValue};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

const INTERACTION_APPLICATION_COMMAND: u8 = 2;
const INTERACTION_MESSAGE_COMPONENT: u8 = 3;

#[derive(Debug, Deserialize)]
struct RawInteraction {
    id: String,
    application_id: String,
    token: String,
    #[serde(rename = "type")]
    kind: u8,
    #[serde(default)]
    data: Option<RawData>,
}

#[derive(Debug, Deserialize)]
struct RawReference {
    id: String,
    application_id: String,
    token: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawData {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    options: Vec<RawOption>,
    #[serde(default)]
    custom_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawOption {
    name: String,
    #[serde(default)]
    value: Value,
}

/// An interaction the bot knows how to answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    Command(InteractionRef, Command),
    Component(InteractionRef, String),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed interaction: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unsupported interaction type {0}")]
    Unsupported(u8),
    #[error("interaction is missing `{0}`")]
    Missing(&'static str),
    #[error(transparent)]
    Command(#[from] CommandError),
}

impl DecodeError {
    /// Whether the invoker is waiting on an answer to this interaction.
    pub fn answerable(&self) -> bool {
        matches!(self, DecodeError::Missing(_) | DecodeError::Command(_))
    }
}

/// Just enough of an interaction to answer it, even when the rest of the
/// payload cannot be decoded.
pub fn reference(payload: &Value) -> Option<InteractionRef> {
    let raw = RawReference::deserialize(payload).ok()?;
    Some(InteractionRef {
        id: raw.id,
        application_id: raw.application_id,
        token: raw.token,
    })
}

pub fn decode(payload: Value) -> Result<Incoming, DecodeError> {
    let raw: RawInteraction = serde_json::from_value(payload)?;
    let interaction = InteractionRef {
        id: raw.id,
        application_id: raw.application_id,
        token: raw.token,
    };
    let data = raw.data.unwrap_or_default();

    match raw.kind {
        INTERACTION_APPLICATION_COMMAND => {
            let name = data.name.ok_or(DecodeError::Missing("data.name"))?;
            let options: HashMap<String, OptionValue> = data
                .options
                .into_iter()
                .filter_map(|option| option_value(option.value).map(|value| (option.name, value)))
                .collect();
            let command = Command::from_invocation(&name, &options)?;
            Ok(Incoming::Command(interaction, command))
        }
        INTERACTION_MESSAGE_COMPONENT => {
            let custom_id = data.custom_id.ok_or(DecodeError::Missing("data.custom_id"))?;
            Ok(Incoming::Component(interaction, custom_id))
        }
        other => Err(DecodeError::Unsupported(other)),
    }
}

fn option_value(value: Value) -> Option<OptionValue> {
    match value {
        Value::Number(number) => number.as_i64().map(OptionValue::Integer),
        Value::String(text) => Some(OptionValue::String(text)),
        _ => None,
    }
}
