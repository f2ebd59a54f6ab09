use std::fmt;

use crate::{navigation::NavAction, session::SessionId};

const CONTROL_ID_PREFIX: &str = "ft";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Blue,
    Green,
    Purple,
    Orange,
    Yellow,
    Gold,
    Blurple,
}

impl Accent {
    pub fn rgb(self) -> u32 {
        match self {
            Accent::Blue => 0x3498db,
            Accent::Green => 0x2ecc71,
            Accent::Purple => 0x9b59b6,
            Accent::Orange => 0xe67e22,
            Accent::Yellow => 0xfee75c,
            Accent::Gold => 0xf1c40f,
            Accent::Blurple => 0x5865f2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayCard {
    pub title: String,
    pub description: Option<String>,
    pub accent: Option<Accent>,
    pub fields: Vec<CardField>,
    pub footer: Option<String>,
    pub thumbnail_url: Option<String>,
    pub image_url: Option<String>,
}

impl DisplayCard {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn accent(mut self, accent: Accent) -> Self {
        self.accent = Some(accent);
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(CardField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    #[cfg(test)]
    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlStyle {
    Primary,
    Success,
}

/// What a button does when pressed. Navigation actions move the cursor of the
/// bound session; the rest open a private detail view of the bound record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAction {
    Navigate(NavAction),
    Repository,
    LiveDemo,
    ProjectDetails,
    UserStats,
    SlackId,
    PriceInfo,
    Availability,
}

impl ControlAction {
    fn tag(self) -> &'static str {
        match self {
            ControlAction::Navigate(NavAction::First) => "first",
            ControlAction::Navigate(NavAction::Previous) => "prev",
            ControlAction::Navigate(NavAction::Next) => "next",
            ControlAction::Navigate(NavAction::Last) => "last",
            ControlAction::Repository => "repo",
            ControlAction::LiveDemo => "demo",
            ControlAction::ProjectDetails => "details",
            ControlAction::UserStats => "stats",
            ControlAction::SlackId => "slack",
            ControlAction::PriceInfo => "price",
            ControlAction::Availability => "availability",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "first" => ControlAction::Navigate(NavAction::First),
            "prev" => ControlAction::Navigate(NavAction::Previous),
            "next" => ControlAction::Navigate(NavAction::Next),
            "last" => ControlAction::Navigate(NavAction::Last),
            "repo" => ControlAction::Repository,
            "demo" => ControlAction::LiveDemo,
            "details" => ControlAction::ProjectDetails,
            "stats" => ControlAction::UserStats,
            "slack" => ControlAction::SlackId,
            "price" => ControlAction::PriceInfo,
            "availability" => ControlAction::Availability,
            _ => return None,
        })
    }
}

/// Callback identifier carried by a button: the session it belongs to plus
/// the action it triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlId {
    pub session: SessionId,
    pub action: ControlAction,
}

impl ControlId {
    pub fn new(session: SessionId, action: ControlAction) -> Self {
        Self { session, action }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.splitn(3, ':');
        if parts.next()? != CONTROL_ID_PREFIX {
            return None;
        }
        let session = SessionId::parse(parts.next()?)?;
        let action = ControlAction::from_tag(parts.next()?)?;
        Some(Self { session, action })
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{CONTROL_ID_PREFIX}:{}:{}",
            self.session,
            self.action.tag()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub id: ControlId,
    pub label: String,
    pub emoji: Option<String>,
    pub style: ControlStyle,
    pub disabled: bool,
}

impl Control {
    pub fn new(
        session: SessionId,
        action: ControlAction,
        label: impl Into<String>,
        style: ControlStyle,
    ) -> Self {
        Self {
            id: ControlId::new(session, action),
            label: label.into(),
            emoji: None,
            style,
            disabled: false,
        }
    }

    pub fn emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Everything needed to deliver or re-render one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub content: Option<String>,
    pub card: Option<DisplayCard>,
    pub controls: Vec<Control>,
    pub ephemeral: bool,
}

impl OutgoingMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn card(card: DisplayCard) -> Self {
        Self {
            card: Some(card),
            ..Self::default()
        }
    }

    pub fn with_controls(mut self, controls: Vec<Control>) -> Self {
        self.controls = controls;
        self
    }

    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    #[cfg(test)]
    pub fn control(&self, action: ControlAction) -> Option<&Control> {
        self.controls
            .iter()
            .find(|control| control.id.action == action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_ids_parse_back() {
        let session = SessionId::generate();
        for action in [
            ControlAction::Navigate(NavAction::First),
            ControlAction::Navigate(NavAction::Last),
            ControlAction::PriceInfo,
            ControlAction::SlackId,
        ] {
            let encoded = ControlId::new(session.clone(), action).to_string();
            assert!(encoded.len() <= 100, "{encoded} exceeds the custom id limit");
            assert_eq!(
                ControlId::parse(&encoded),
                Some(ControlId::new(session.clone(), action))
            );
        }
    }

    #[test]
    fn foreign_control_ids_are_ignored() {
        assert_eq!(ControlId::parse("other:abc:next"), None);
        assert_eq!(ControlId::parse("ft:not-a-session:next"), None);
        let session = SessionId::generate();
        assert_eq!(ControlId::parse(&format!("ft:{session}:jump")), None);
    }
}
