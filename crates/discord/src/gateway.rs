use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{protocol::CloseFrame, Message},
};
use tracing::{debug, info, warn};

pub const DEFAULT_GATEWAY_URL: &str = "wss://gateway.discord.gg/?v=10&encoding=json";
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);
/// Only interactions are needed, which arrive regardless of intents; GUILDS
/// keeps the connection minimal.
pub const INTENT_GUILDS: u64 = 1;

const OP_DISPATCH: u8 = 0;
const OP_HEARTBEAT: u8 = 1;
const OP_IDENTIFY: u8 = 2;
const OP_RECONNECT: u8 = 7;
const OP_INVALID_SESSION: u8 = 9;
const OP_HELLO: u8 = 10;
const OP_HEARTBEAT_ACK: u8 = 11;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("websocket failure: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("malformed gateway frame: {0}")]
    Frame(#[from] serde_json::Error),
    #[error("expected HELLO, received op {0}")]
    UnexpectedHello(u8),
    #[error("gateway closed the connection before HELLO")]
    ClosedBeforeHello,
    #[error("gateway stopped acknowledging heartbeats")]
    HeartbeatTimeout,
    #[error("gateway rejected the session with close code {code}: {reason}")]
    Rejected { code: u16, reason: String },
}

impl GatewayError {
    /// Errors that reconnecting cannot fix, such as a bad token.
    pub fn is_fatal(&self) -> bool {
        matches!(self, GatewayError::Rejected { code, .. } if is_fatal_close(*code))
    }
}

fn is_fatal_close(code: u16) -> bool {
    matches!(code, 4004 | 4010 | 4011 | 4012 | 4013 | 4014)
}

#[derive(Debug, Deserialize)]
pub struct Frame {
    pub op: u8,
    #[serde(default)]
    pub d: Value,
    #[serde(default)]
    pub s: Option<u64>,
    #[serde(default)]
    pub t: Option<String>,
}

pub fn parse_frame(text: &str) -> Result<Frame, GatewayError> {
    Ok(serde_json::from_str(text)?)
}

#[derive(Debug, Deserialize)]
struct Hello {
    heartbeat_interval: u64,
}

#[derive(Debug, Deserialize)]
struct Ready {
    application: ReadyApplication,
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReadyApplication {
    id: String,
}

pub fn identify_payload(token: &str, intents: u64) -> Value {
    json!({
        "op": OP_IDENTIFY,
        "d": {
            "token": token,
            "intents": intents,
            "properties": {
                "os": std::env::consts::OS,
                "browser": "flavortown-bot",
                "device": "flavortown-bot"
            }
        }
    })
}

fn heartbeat_payload(sequence: Option<u64>) -> Value {
    json!({ "op": OP_HEARTBEAT, "d": sequence })
}

/// Receives the events the bot reacts to. Implementations must return
/// quickly; long work belongs on a spawned task.
pub trait GatewayHandler: Send + Sync {
    fn ready(&self, application_id: &str);
    fn interaction(&self, payload: Value);
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub url: String,
    pub token: String,
    pub intents: u64,
    pub reconnect_delay: Duration,
}

impl GatewayConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            url: DEFAULT_GATEWAY_URL.to_string(),
            token: token.into(),
            intents: INTENT_GUILDS,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

/// Keeps a gateway session alive, reconnecting with a fresh IDENTIFY after
/// every drop. Returns only when the gateway refuses the bot outright.
pub async fn run<H: GatewayHandler>(config: &GatewayConfig, handler: &H) -> GatewayError {
    loop {
        match run_session(config, handler).await {
            Ok(()) => info!("gateway: session ended, reconnecting"),
            Err(err) if err.is_fatal() => return err,
            Err(err) => warn!(%err, "gateway: session failed, reconnecting"),
        }
        tokio::time::sleep(config.reconnect_delay).await;
    }
}

/// One connection from HELLO until the socket closes. `Ok` means the
/// gateway asked for a reconnect or closed cleanly.
pub async fn run_session<H: GatewayHandler>(
    config: &GatewayConfig,
    handler: &H,
) -> Result<(), GatewayError> {
    let (socket, _) = connect_async(config.url.as_str()).await?;
    let (mut writer, mut reader) = socket.split();

    let hello = loop {
        match reader.next().await {
            Some(Ok(Message::Text(text))) => break parse_frame(&text)?,
            Some(Ok(Message::Close(frame))) => return Err(closed(frame)),
            Some(Ok(_)) => continue,
            Some(Err(err)) => return Err(err.into()),
            None => return Err(GatewayError::ClosedBeforeHello),
        }
    };
    if hello.op != OP_HELLO {
        return Err(GatewayError::UnexpectedHello(hello.op));
    }
    let hello: Hello = serde_json::from_value(hello.d)?;
    let period = Duration::from_millis(hello.heartbeat_interval.max(1));
    debug!(interval_ms = hello.heartbeat_interval, "gateway: hello");

    writer
        .send(Message::Text(identify_payload(&config.token, config.intents).to_string()))
        .await?;

    let mut heartbeat = interval_at(Instant::now() + period, period);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut sequence: Option<u64> = None;
    let mut acknowledged = true;

    loop {
        tokio::select! {
            _ = heartbeat.tick() => {
                if !acknowledged {
                    let _ = writer.send(Message::Close(None)).await;
                    return Err(GatewayError::HeartbeatTimeout);
                }
                acknowledged = false;
                writer.send(Message::Text(heartbeat_payload(sequence).to_string())).await?;
            }
            message = reader.next() => {
                let text = match message {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(frame))) => {
                        let err = closed(frame);
                        if err.is_fatal() {
                            return Err(err);
                        }
                        debug!(%err, "gateway: closed by remote");
                        return Ok(());
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(err)) => return Err(err.into()),
                    None => return Ok(()),
                };
                let frame = match parse_frame(&text) {
                    Ok(frame) => frame,
                    Err(err) => {
                        warn!(%err, "gateway: skipping malformed frame");
                        continue;
                    }
                };
                if frame.s.is_some() {
                    sequence = frame.s;
                }
                match frame.op {
                    OP_DISPATCH => dispatch(handler, frame),
                    OP_HEARTBEAT => {
                        writer.send(Message::Text(heartbeat_payload(sequence).to_string())).await?;
                    }
                    OP_HEARTBEAT_ACK => acknowledged = true,
                    OP_RECONNECT | OP_INVALID_SESSION => {
                        info!(op = frame.op, "gateway: asked to reconnect");
                        let _ = writer.send(Message::Close(None)).await;
                        return Ok(());
                    }
                    other => debug!(op = other, "gateway: ignoring frame"),
                }
            }
        }
    }
}

fn closed(frame: Option<CloseFrame<'_>>) -> GatewayError {
    match frame {
        Some(frame) => GatewayError::Rejected {
            code: u16::from(frame.code),
            reason: frame.reason.into_owned(),
        },
        None => GatewayError::Rejected {
            code: 1000,
            reason: String::new(),
        },
    }
}

fn dispatch<H: GatewayHandler>(handler: &H, frame: Frame) {
    match frame.t.as_deref() {
        Some("READY") => match serde_json::from_value::<Ready>(frame.d) {
            Ok(ready) => {
                info!(
                    application_id = %ready.application.id,
                    session_id = ready.session_id.as_deref().unwrap_or_default(),
                    "gateway: ready"
                );
                handler.ready(&ready.application.id);
            }
            Err(err) => warn!(%err, "gateway: malformed READY"),
        },
        Some("INTERACTION_CREATE") => handler.interaction(frame.d),
        Some(other) => debug!(event = other, "gateway: ignoring dispatch"),
        None => {}
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
