use std::sync::Arc;

use super::*;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method as HttpMethod, StatusCode as HttpStatus, Uri},
    response::IntoResponse,
    Json, Router,
};
use bot_core::{card::DisplayCard, COMMANDS};
use serde_json::json;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    path: String,
    authorization: String,
    body: Value,
}

#[derive(Clone, Default)]
struct ServerState {
    requests: Arc<Mutex<Vec<Recorded>>>,
}

async fn discord(
    State(state): State<ServerState>,
    method: HttpMethod,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> axum::response::Response {
    let path = uri
        .path_and_query()
        .map(|path| path.as_str().to_string())
        .unwrap_or_default();
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state.requests.lock().await.push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        authorization: headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string(),
        body: body.clone(),
    });

    match (method.as_str(), path.as_str()) {
        ("GET", "/applications/@me") => Json(json!({"id": "app-1", "name": "bot"})).into_response(),
        ("PUT", _) => Json(body).into_response(),
        ("POST", path) if path.starts_with("/webhooks/") => {
            Json(json!({"id": "555", "content": body["content"]})).into_response()
        }
        (_, path) if path.ends_with("/messages/gone") => HttpStatus::NOT_FOUND.into_response(),
        (_, path) if path.ends_with("/messages/locked") => HttpStatus::FORBIDDEN.into_response(),
        (_, path) if path.ends_with("/messages/broken") => {
            (HttpStatus::INTERNAL_SERVER_ERROR, "boom").into_response()
        }
        ("PATCH", _) => Json(json!({"id": "1"})).into_response(),
        _ => HttpStatus::NO_CONTENT.into_response(),
    }
}

async fn spawn_server() -> (String, ServerState) {
    let state = ServerState::default();
    let app = Router::new().fallback(discord).with_state(state.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    (format!("http://{addr}/api/v10"), state)
}

fn interaction() -> InteractionRef {
    InteractionRef {
        id: "10".into(),
        application_id: "app-1".into(),
        token: "tok".into(),
    }
}

async fn requests(state: &ServerState) -> Vec<Recorded> {
    std::mem::take(&mut *state.requests.lock().await)
}

#[tokio::test]
async fn acknowledgements_and_responses_use_interaction_callback() {
    let (base, state) = spawn_server().await;
    let rest = DiscordRest::with_api_base(base, "bot-token");

    rest.acknowledge(&interaction(), Acknowledgement::DeferredMessage)
        .await
        .expect("defer");
    rest.acknowledge(&interaction(), Acknowledgement::DeferredUpdate)
        .await
        .expect("defer update");
    let delivered = rest
        .respond(&interaction(), &OutgoingMessage::text("hi").ephemeral())
        .await
        .expect("respond");
    rest.update(&interaction(), &OutgoingMessage::card(DisplayCard::new("Page 2")))
        .await
        .expect("update");
    assert_eq!(delivered, MessageRef::Original(interaction()));

    let recorded = requests(&state).await;
    assert!(recorded
        .iter()
        .all(|request| request.path == "/api/v10/interactions/10/tok/callback"
            && request.method == "POST"
            && request.authorization == "Bot bot-token"));
    assert_eq!(recorded[0].body, json!({"type": 5}));
    assert_eq!(recorded[1].body, json!({"type": 6}));
    assert_eq!(recorded[2].body["type"], 4);
    assert_eq!(recorded[2].body["data"]["flags"], 64);
    assert_eq!(recorded[3].body["type"], 7);
    assert_eq!(recorded[3].body["data"]["embeds"][0]["title"], "Page 2");
}

#[tokio::test]
async fn followups_wait_for_the_created_message() {
    let (base, state) = spawn_server().await;
    let rest = DiscordRest::with_api_base(base, "bot-token");

    let delivered = rest
        .followup(&interaction(), &OutgoingMessage::text("later"))
        .await
        .expect("followup");
    assert_eq!(
        delivered,
        MessageRef::Followup {
            interaction: interaction(),
            message_id: "555".into(),
        }
    );

    rest.edit(&delivered, &OutgoingMessage::text("edited").ephemeral())
        .await
        .expect("edit followup");
    rest.edit(
        &MessageRef::Original(interaction()),
        &OutgoingMessage::text("edited"),
    )
    .await
    .expect("edit original");
    rest.delete(&delivered).await.expect("delete");

    let recorded = requests(&state).await;
    let routes: Vec<_> = recorded
        .iter()
        .map(|request| format!("{} {}", request.method, request.path))
        .collect();
    assert_eq!(
        routes,
        [
            "POST /api/v10/webhooks/app-1/tok?wait=true",
            "PATCH /api/v10/webhooks/app-1/tok/messages/555",
            "PATCH /api/v10/webhooks/app-1/tok/messages/@original",
            "DELETE /api/v10/webhooks/app-1/tok/messages/555",
        ]
    );
    assert_eq!(recorded[1].body.get("flags"), None);
}

#[tokio::test]
async fn deletion_failures_map_to_platform_errors() {
    let (base, _state) = spawn_server().await;
    let rest = DiscordRest::with_api_base(base, "bot-token");
    let target = |message_id: &str| MessageRef::Followup {
        interaction: interaction(),
        message_id: message_id.into(),
    };

    assert_eq!(rest.delete(&target("gone")).await, Err(PlatformError::NotFound));
    assert_eq!(rest.delete(&target("locked")).await, Err(PlatformError::Forbidden));
    assert_eq!(
        rest.delete(&target("broken")).await,
        Err(PlatformError::Http {
            status: 500,
            message: "boom".into()
        })
    );
}

#[tokio::test]
async fn registers_commands_globally_or_per_guild() {
    let (base, state) = spawn_server().await;
    let rest = DiscordRest::with_api_base(base, "bot-token");

    let application_id = rest.application_id().await.expect("application");
    assert_eq!(application_id, "app-1");
    let global = rest
        .register_commands(&application_id, None, COMMANDS)
        .await
        .expect("global");
    let guild = rest
        .register_commands(&application_id, Some("77"), COMMANDS)
        .await
        .expect("guild");
    assert_eq!(global, COMMANDS.len());
    assert_eq!(guild, COMMANDS.len());

    let recorded = requests(&state).await;
    assert_eq!(recorded[1].path, "/api/v10/applications/app-1/commands");
    assert_eq!(recorded[2].path, "/api/v10/applications/app-1/guilds/77/commands");
    assert_eq!(recorded[1].body[0]["name"], "project");
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let rest = DiscordRest::with_api_base("http://127.0.0.1:9", "bot-token");
    let result = rest.delete(&MessageRef::Original(interaction())).await;
    assert!(matches!(result, Err(PlatformError::Transport(_))));
}
