use std::sync::Arc;

use flavortown_client::TrackerApi;
use shared::error::ApiError;
use tracing::{debug, error, info};

use crate::{
    card::{ControlAction, ControlId, OutgoingMessage},
    commands::Command,
    context::AppContext,
    lifecycle::{InteractionLifecycle, InteractionRef},
    navigation::{CategoryCursor, NavAction, PageCursor, StoreCatalog},
    session::{SearchKind, Session, SessionId},
    views::{self, SearchPage},
};

pub const EXPIRED_MESSAGE: &str = "This interaction has expired. Run the command again.";
pub const EMPTY_STORE_MESSAGE: &str = "No store items found.";

fn error_message(err: &ApiError) -> OutgoingMessage {
    OutgoingMessage::text(format!("Error: {err}"))
}

/// Answers one slash command: acknowledge, fetch, render, deliver publicly.
pub async fn handle_command(ctx: &AppContext, interaction: InteractionRef, command: Command) {
    let name = command.name();
    let mut lifecycle = ctx.lifecycle(interaction);
    if let Err(err) = lifecycle.defer().await {
        error!(command = name, %err, "command: failed to acknowledge");
        return;
    }

    let message = match render_command(ctx, &command).await {
        Ok(message) => message,
        Err(err) => {
            info!(command = name, %err, "command: remote call failed");
            error_message(&err)
        }
    };
    if let Err(err) = lifecycle.send(message, false).await {
        error!(command = name, %err, "command: failed to deliver reply");
        let notice = OutgoingMessage::text(format!("Error: {err}"));
        if let Err(err) = lifecycle.send(notice, true).await {
            error!(command = name, %err, "command: failed to deliver failure notice");
        }
    }
}

/// Answers an invocation that could not be turned into a command, privately,
/// so the invoker is not left waiting on it.
pub async fn reject_invocation(ctx: &AppContext, interaction: InteractionRef, reason: &str) {
    let mut lifecycle = ctx.lifecycle(interaction);
    let notice = OutgoingMessage::text(format!("Error: {reason}"));
    if let Err(err) = lifecycle.send(notice, true).await {
        error!(%err, reason, "command: failed to reject invocation");
    }
}

async fn render_command(ctx: &AppContext, command: &Command) -> Result<OutgoingMessage, ApiError> {
    let api = ctx.api.as_ref();
    match command {
        Command::Project { project_id } => {
            let project = api.project(*project_id).await?;
            let session = ctx.sessions.open(Session::Project(project.clone())).await;
            Ok(views::project_message(&session, &project))
        }
        Command::Projects { query, page } => {
            open_search(ctx, SearchKind::Projects, Some(query.clone()), *page).await
        }
        Command::Devlog { devlog_id } => {
            let devlog = api.devlog(*devlog_id).await?;
            Ok(views::devlog_message(&devlog))
        }
        Command::User { user_id } => {
            let user = api.user(*user_id).await?;
            let session = ctx.sessions.open(Session::User(user.clone())).await;
            Ok(views::user_message(&session, &user))
        }
        Command::Users { query, page } => {
            open_search(ctx, SearchKind::Users, Some(query.clone()), *page).await
        }
        Command::Store => {
            let items = api.store_items().await?;
            let Some(catalog) =
                StoreCatalog::from_items(items, ctx.settings.store_items_per_page)
            else {
                return Ok(OutgoingMessage::text(EMPTY_STORE_MESSAGE));
            };
            let catalog = Arc::new(catalog);
            let cursor = catalog.start();
            let session = ctx
                .sessions
                .open(Session::Store {
                    catalog: Arc::clone(&catalog),
                    cursor,
                })
                .await;
            Ok(views::store_message(&session, &catalog, cursor))
        }
        Command::StoreItem { item_id } => {
            let item = api.store_item(*item_id).await?;
            let session = ctx.sessions.open(Session::StoreItem(item.clone())).await;
            Ok(views::store_item_message(&session, &item))
        }
        Command::Devlogs { page } => open_search(ctx, SearchKind::Devlogs, None, *page).await,
    }
}

async fn open_search(
    ctx: &AppContext,
    kind: SearchKind,
    query: Option<String>,
    page: u32,
) -> Result<OutgoingMessage, ApiError> {
    let results = fetch_search(ctx.api.as_ref(), kind, query.as_deref(), page).await?;

    if results.is_empty() {
        return Ok(OutgoingMessage::text(kind.empty_message()));
    }
    let session = ctx
        .sessions
        .open(Session::Search {
            kind,
            query,
            cursor: results.cursor(),
        })
        .await;
    Ok(views::search_message(&session, &results))
}

pub async fn fetch_search(
    api: &dyn TrackerApi,
    kind: SearchKind,
    query: Option<&str>,
    page: u32,
) -> Result<SearchPage, ApiError> {
    Ok(match kind {
        SearchKind::Projects => SearchPage::Projects(api.projects(page, query).await?),
        SearchKind::Users => SearchPage::Users(api.users(page, query).await?),
        SearchKind::Devlogs => SearchPage::Devlogs(api.devlogs(page).await?),
    })
}

/// Answers one button press on a message the bot delivered earlier.
pub async fn handle_component(ctx: &AppContext, interaction: InteractionRef, custom_id: &str) {
    let mut lifecycle = ctx.lifecycle(interaction);
    let Some(control) = ControlId::parse(custom_id) else {
        debug!(custom_id, "component: unrecognised control id");
        reply_expired(&mut lifecycle).await;
        return;
    };
    let Some(session) = ctx.sessions.get(&control.session).await else {
        debug!(session = %control.session, "component: session expired");
        reply_expired(&mut lifecycle).await;
        return;
    };

    match (session, control.action) {
        (Session::Search { kind, query, cursor }, ControlAction::Navigate(action)) => {
            navigate_search(ctx, &mut lifecycle, &control.session, kind, query, cursor, action)
                .await
        }
        (Session::Store { catalog, cursor }, ControlAction::Navigate(action)) => {
            navigate_store(ctx, &mut lifecycle, &control.session, catalog, cursor, action).await
        }
        (session, action) => match views::detail_reply(&session, action) {
            Some(reply) => {
                if let Err(err) = lifecycle.send(reply, true).await {
                    error!(?action, %err, "component: failed to deliver detail reply");
                }
            }
            None => {
                debug!(?action, "component: action does not match session");
                reply_expired(&mut lifecycle).await;
            }
        },
    }
}

async fn reply_expired(lifecycle: &mut InteractionLifecycle) {
    if let Err(err) = lifecycle
        .send(OutgoingMessage::text(EXPIRED_MESSAGE), true)
        .await
    {
        error!(%err, "component: failed to deliver expiry notice");
    }
}

async fn navigate_search(
    ctx: &AppContext,
    lifecycle: &mut InteractionLifecycle,
    session: &SessionId,
    kind: SearchKind,
    query: Option<String>,
    cursor: PageCursor,
    action: NavAction,
) {
    if let Err(err) = lifecycle.defer_update().await {
        error!(%err, "navigation: failed to acknowledge");
        return;
    }
    let target = cursor.apply(action);
    debug!(?action, from = cursor.current(), to = target.current(), "navigation: search");

    let fetched = fetch_search(ctx.api.as_ref(), kind, query.as_deref(), target.current()).await;
    let delivery = match fetched {
        Ok(results) if !results.is_empty() => {
            ctx.sessions
                .update(
                    session,
                    Session::Search {
                        kind,
                        query,
                        cursor: results.cursor(),
                    },
                )
                .await;
            lifecycle.update(views::search_message(session, &results)).await
        }
        Ok(_) => lifecycle
            .send(OutgoingMessage::text(kind.empty_message()), false)
            .await
            .map(|_| ()),
        Err(err) => lifecycle.send(error_message(&err), false).await.map(|_| ()),
    };
    if let Err(err) = delivery {
        error!(%err, "navigation: failed to deliver page");
    }
}

async fn navigate_store(
    ctx: &AppContext,
    lifecycle: &mut InteractionLifecycle,
    session: &SessionId,
    catalog: Arc<StoreCatalog>,
    cursor: CategoryCursor,
    action: NavAction,
) {
    let target = catalog.apply(cursor, action).unwrap_or_else(|| {
        debug!(?action, "navigation: store ignores action");
        cursor
    });
    ctx.sessions
        .update(
            session,
            Session::Store {
                catalog: Arc::clone(&catalog),
                cursor: target,
            },
        )
        .await;
    if let Err(err) = lifecycle
        .update(views::store_message(session, &catalog, target))
        .await
    {
        error!(%err, "navigation: failed to deliver store page");
    }
}

#[cfg(test)]
#[path = "tests/handlers_tests.rs"]
mod tests;
