//! Binds formatted cards to the controls of their session.

use shared::{
    domain::{Devlog, Project, StoreItem, User},
    protocol::{DevlogList, Pagination, ProjectList, UserList},
};

use crate::{
    card::{Control, ControlAction, ControlStyle, DisplayCard, OutgoingMessage},
    format,
    navigation::{CategoryCursor, ControlState, NavAction, PageCursor, StoreCatalog},
    session::{Session, SessionId},
};

/// One fetched page of a flat search.
#[derive(Debug, Clone)]
pub enum SearchPage {
    Projects(ProjectList),
    Users(UserList),
    Devlogs(DevlogList),
}

impl SearchPage {
    pub fn pagination(&self) -> &Pagination {
        match self {
            SearchPage::Projects(list) => &list.pagination,
            SearchPage::Users(list) => &list.pagination,
            SearchPage::Devlogs(list) => &list.pagination,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SearchPage::Projects(list) => list.projects.is_empty(),
            SearchPage::Users(list) => list.users.is_empty(),
            SearchPage::Devlogs(list) => list.devlogs.is_empty(),
        }
    }

    pub fn cursor(&self) -> PageCursor {
        PageCursor::from_pagination(self.pagination())
    }

    pub fn card(&self) -> DisplayCard {
        match self {
            SearchPage::Projects(list) => format::project_list_card(list),
            SearchPage::Users(list) => format::user_list_card(list),
            SearchPage::Devlogs(list) => format::devlog_list_card(list),
        }
    }
}

pub fn pagination_controls(session: &SessionId, state: ControlState) -> Vec<Control> {
    [
        (NavAction::First, "⏮️ First"),
        (NavAction::Previous, "◀️ Previous"),
        (NavAction::Next, "Next ▶️"),
        (NavAction::Last, "Last ⏭️"),
    ]
    .into_iter()
    .map(|(action, label)| {
        Control::new(
            session.clone(),
            ControlAction::Navigate(action),
            label,
            ControlStyle::Primary,
        )
        .disabled(!state.enabled(action))
    })
    .collect()
}

pub fn store_controls(session: &SessionId, state: ControlState) -> Vec<Control> {
    [(NavAction::Previous, "<--"), (NavAction::Next, "-->")]
        .into_iter()
        .map(|(action, label)| {
            Control::new(
                session.clone(),
                ControlAction::Navigate(action),
                label,
                ControlStyle::Primary,
            )
            .disabled(!state.enabled(action))
        })
        .collect()
}

pub fn search_message(session: &SessionId, page: &SearchPage) -> OutgoingMessage {
    OutgoingMessage::card(page.card())
        .with_controls(pagination_controls(session, page.cursor().control_state()))
}

pub fn store_message(
    session: &SessionId,
    catalog: &StoreCatalog,
    cursor: CategoryCursor,
) -> OutgoingMessage {
    OutgoingMessage::card(format::store_page_card(catalog, cursor))
        .with_controls(store_controls(session, catalog.control_state(cursor)))
}

fn has_link(link: &Option<String>) -> bool {
    link.as_deref().is_some_and(|link| !link.trim().is_empty())
}

pub fn project_message(session: &SessionId, project: &Project) -> OutgoingMessage {
    let controls = vec![
        Control::new(
            session.clone(),
            ControlAction::Repository,
            "📚 Repository",
            ControlStyle::Success,
        )
        .emoji("🔗")
        .disabled(!has_link(&project.repo_url)),
        Control::new(
            session.clone(),
            ControlAction::LiveDemo,
            "🎯 Live Demo",
            ControlStyle::Success,
        )
        .emoji("🌐")
        .disabled(!has_link(&project.demo_url)),
        Control::new(
            session.clone(),
            ControlAction::ProjectDetails,
            "📖 View Full Details",
            ControlStyle::Primary,
        ),
    ];
    OutgoingMessage::card(format::project_card(project)).with_controls(controls)
}

pub fn devlog_message(devlog: &Devlog) -> OutgoingMessage {
    OutgoingMessage::card(format::devlog_card(devlog))
}

pub fn user_message(session: &SessionId, user: &User) -> OutgoingMessage {
    let controls = vec![
        Control::new(
            session.clone(),
            ControlAction::UserStats,
            "📊 Stats",
            ControlStyle::Primary,
        )
        .emoji("📈"),
        Control::new(
            session.clone(),
            ControlAction::SlackId,
            "🔗 Slack ID",
            ControlStyle::Primary,
        ),
    ];
    OutgoingMessage::card(format::user_card(user)).with_controls(controls)
}

pub fn store_item_message(session: &SessionId, item: &StoreItem) -> OutgoingMessage {
    let controls = vec![
        Control::new(
            session.clone(),
            ControlAction::PriceInfo,
            "💰 Price Info",
            ControlStyle::Success,
        )
        .emoji("💵"),
        Control::new(
            session.clone(),
            ControlAction::Availability,
            "📦 Availability",
            ControlStyle::Primary,
        ),
    ];
    OutgoingMessage::card(format::store_item_card(item)).with_controls(controls)
}

/// The private reply a detail control produces for the record held by its
/// session, or `None` when the action does not belong to that session.
pub fn detail_reply(session: &Session, action: ControlAction) -> Option<OutgoingMessage> {
    let reply = match (session, action) {
        (Session::Project(project), ControlAction::Repository) => OutgoingMessage::text(format!(
            "Repository: {}",
            project.repo_url.as_deref().unwrap_or_default()
        )),
        (Session::Project(project), ControlAction::LiveDemo) => OutgoingMessage::text(format!(
            "Live Demo: {}",
            project.demo_url.as_deref().unwrap_or_default()
        )),
        (Session::Project(project), ControlAction::ProjectDetails) => {
            OutgoingMessage::card(format::project_details_card(project))
        }
        (Session::User(user), ControlAction::UserStats) => {
            OutgoingMessage::card(format::user_stats_card(user))
        }
        (Session::User(user), ControlAction::SlackId) => {
            OutgoingMessage::text(format::slack_id_text(user))
        }
        (Session::StoreItem(item), ControlAction::PriceInfo) => {
            OutgoingMessage::card(format::store_pricing_card(item))
        }
        (Session::StoreItem(item), ControlAction::Availability) => {
            OutgoingMessage::card(format::store_availability_card(item))
        }
        _ => return None,
    };
    Some(reply.ephemeral())
}
