//! JSON shapes Discord expects for messages, interaction callbacks and
//! command registration.

use bot_core::{
    CommandSpec, Control, ControlStyle, DisplayCard, OptionKind, OptionSpec, OutgoingMessage,
};
use serde::Serialize;

pub const EPHEMERAL_FLAG: u64 = 1 << 6;
pub const MAX_BUTTONS_PER_ROW: usize = 5;

pub const CALLBACK_CHANNEL_MESSAGE: u8 = 4;
pub const CALLBACK_DEFERRED_CHANNEL_MESSAGE: u8 = 5;
pub const CALLBACK_DEFERRED_UPDATE_MESSAGE: u8 = 6;
pub const CALLBACK_UPDATE_MESSAGE: u8 = 7;

const COMPONENT_ACTION_ROW: u8 = 1;
const COMPONENT_BUTTON: u8 = 2;
const BUTTON_PRIMARY: u8 = 1;
const BUTTON_SUCCESS: u8 = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
    pub components: Vec<ActionRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
}

impl From<&OutgoingMessage> for MessageBody {
    fn from(message: &OutgoingMessage) -> Self {
        Self {
            content: message.content.clone(),
            embeds: message.card.iter().map(Embed::from).collect(),
            components: action_rows(&message.controls),
            flags: message.ephemeral.then_some(EPHEMERAL_FLAG),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedMedia>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedMedia>,
}

impl From<&DisplayCard> for Embed {
    fn from(card: &DisplayCard) -> Self {
        Self {
            title: card.title.clone(),
            description: card
                .description
                .clone()
                .filter(|description| !description.trim().is_empty()),
            color: card.accent.map(|accent| accent.rgb()),
            fields: card
                .fields
                .iter()
                .map(|field| EmbedField {
                    name: field.name.clone(),
                    value: field.value.clone(),
                    inline: field.inline,
                })
                .collect(),
            footer: card.footer.clone().map(|text| EmbedFooter { text }),
            thumbnail: card.thumbnail_url.clone().map(|url| EmbedMedia { url }),
            image: card.image_url.clone().map(|url| EmbedMedia { url }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedMedia {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionRow {
    #[serde(rename = "type")]
    pub kind: u8,
    pub components: Vec<Button>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Button {
    #[serde(rename = "type")]
    pub kind: u8,
    pub style: u8,
    pub label: String,
    pub custom_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<Emoji>,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Emoji {
    pub name: String,
}

impl From<&Control> for Button {
    fn from(control: &Control) -> Self {
        Self {
            kind: COMPONENT_BUTTON,
            style: match control.style {
                ControlStyle::Primary => BUTTON_PRIMARY,
                ControlStyle::Success => BUTTON_SUCCESS,
            },
            label: control.label.clone(),
            custom_id: control.id.to_string(),
            emoji: control.emoji.clone().map(|name| Emoji { name }),
            disabled: control.disabled,
        }
    }
}

pub fn action_rows(controls: &[Control]) -> Vec<ActionRow> {
    controls
        .chunks(MAX_BUTTONS_PER_ROW)
        .map(|chunk| ActionRow {
            kind: COMPONENT_ACTION_ROW,
            components: chunk.iter().map(Button::from).collect(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionCallback {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<MessageBody>,
}

impl InteractionCallback {
    pub fn empty(kind: u8) -> Self {
        Self { kind, data: None }
    }

    pub fn message(kind: u8, message: &OutgoingMessage) -> Self {
        Self {
            kind,
            data: Some(MessageBody::from(message)),
        }
    }
}

const COMMAND_CHAT_INPUT: u8 = 1;
const OPTION_STRING: u8 = 3;
const OPTION_INTEGER: u8 = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationCommand {
    #[serde(rename = "type")]
    pub kind: u8,
    pub name: String,
    pub description: String,
    pub options: Vec<CommandOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandOption {
    #[serde(rename = "type")]
    pub kind: u8,
    pub name: String,
    pub description: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
}

impl From<&OptionSpec> for CommandOption {
    fn from(option: &OptionSpec) -> Self {
        let (kind, min_value) = match option.kind {
            OptionKind::Integer if option.name == "page" => (OPTION_INTEGER, Some(1)),
            OptionKind::Integer => (OPTION_INTEGER, None),
            OptionKind::String => (OPTION_STRING, None),
        };
        Self {
            kind,
            name: option.name.to_string(),
            description: option.description.to_string(),
            required: option.required,
            min_value,
        }
    }
}

impl From<&CommandSpec> for ApplicationCommand {
    fn from(spec: &CommandSpec) -> Self {
        Self {
            kind: COMMAND_CHAT_INPUT,
            name: spec.name.to_string(),
            description: spec.description.to_string(),
            options: spec.options.iter().map(CommandOption::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use bot_core::{card::Accent, format, session::SessionId, ControlAction, COMMANDS};
    use serde_json::json;
    use shared::{domain::Project, protocol::{Pagination, ProjectList}};

    use super::*;

    #[test]
    fn buttons_wrap_into_rows_of_five() {
        let session = SessionId::generate();
        let controls: Vec<_> = (0..7)
            .map(|index| {
                Control::new(
                    session.clone(),
                    ControlAction::PriceInfo,
                    format!("b{index}"),
                    ControlStyle::Primary,
                )
            })
            .collect();
        let rows = action_rows(&controls);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].components.len(), 5);
        assert_eq!(rows[1].components.len(), 2);
    }

    #[test]
    fn encodes_private_card_with_controls() {
        let session = SessionId::generate();
        let card = DisplayCard::new("Oven")
            .accent(Accent::Gold)
            .field("Stock", "3", true)
            .footer("Item ID: 1");
        let message = OutgoingMessage::card(card)
            .with_controls(vec![Control::new(
                session.clone(),
                ControlAction::PriceInfo,
                "💰 Price Info",
                ControlStyle::Success,
            )
            .emoji("💵")
            .disabled(true)])
            .ephemeral();

        let body = serde_json::to_value(MessageBody::from(&message)).expect("encode");
        assert_eq!(
            body,
            json!({
                "embeds": [{
                    "title": "Oven",
                    "color": 0xf1c40f,
                    "fields": [{"name": "Stock", "value": "3", "inline": true}],
                    "footer": {"text": "Item ID: 1"}
                }],
                "components": [{
                    "type": 1,
                    "components": [{
                        "type": 2,
                        "style": 3,
                        "label": "💰 Price Info",
                        "custom_id": format!("ft:{session}:price"),
                        "emoji": {"name": "💵"},
                        "disabled": true
                    }]
                }],
                "flags": 64
            })
        );
    }

    #[test]
    fn projects_without_description_still_encode_field_values() {
        let project: Project =
            serde_json::from_value(json!({"id": 1, "title": "Oven"})).expect("project");
        let list = ProjectList {
            projects: vec![project.clone()],
            pagination: Pagination::default(),
        };

        let body = serde_json::to_value(MessageBody::from(&OutgoingMessage::card(
            format::project_list_card(&list),
        )))
        .expect("encode");
        assert_eq!(
            body["embeds"][0]["fields"],
            json!([{"name": "Oven", "value": "N/A", "inline": false}])
        );

        let single = serde_json::to_value(MessageBody::from(&OutgoingMessage::card(
            format::project_card(&project),
        )))
        .expect("encode");
        assert!(single["embeds"][0].get("description").is_none());
    }

    #[test]
    fn text_messages_clear_embeds_and_components() {
        let body = serde_json::to_value(InteractionCallback::message(
            CALLBACK_UPDATE_MESSAGE,
            &OutgoingMessage::text("No users found."),
        ))
        .expect("encode");
        assert_eq!(
            body,
            json!({
                "type": 7,
                "data": {"content": "No users found.", "embeds": [], "components": []}
            })
        );
    }

    #[test]
    fn registration_payload_marks_page_minimum() {
        let projects = COMMANDS
            .iter()
            .find(|spec| spec.name == "projects")
            .expect("projects command");
        let body = serde_json::to_value(ApplicationCommand::from(projects)).expect("encode");
        assert_eq!(body["type"], 1);
        assert_eq!(body["options"][0]["type"], 3);
        assert_eq!(body["options"][0]["required"], true);
        assert_eq!(body["options"][1]["name"], "page");
        assert_eq!(body["options"][1]["min_value"], 1);
        assert_eq!(body["options"][1]["required"], false);
    }
}
