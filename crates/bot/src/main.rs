use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{routing::get, Router};
use bot::config::load_settings;
use bot_core::AppContext;
use discord::{gateway, DiscordRest, GatewayConfig, InteractionDispatcher};
use flavortown_client::FlavortownClient;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    debug!(?settings, "bot: settings loaded");
    let credentials = settings.credentials().map_err(|err| {
        error!(%err, "bot: missing credentials");
        err
    })?;

    let api = Arc::new(FlavortownClient::with_base_url(
        settings.flavortown_base_url.clone(),
        credentials.flavortown_api_key,
    ));
    let rest = Arc::new(DiscordRest::with_api_base(
        settings.discord_api_base.clone(),
        credentials.discord_token.clone(),
    ));
    let ctx = AppContext::new(api, rest.clone(), settings.bot_settings());

    let addr: SocketAddr = settings
        .health_bind
        .parse()
        .with_context(|| format!("invalid health bind address '{}'", settings.health_bind))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind health endpoint on {addr}"))?;
    info!(%addr, "health endpoint listening");
    let health = tokio::spawn(async move { axum::serve(listener, build_router()).await });

    let mut gateway_config = GatewayConfig::new(credentials.discord_token);
    gateway_config.url = settings.gateway_url.clone();
    let dispatcher = InteractionDispatcher::new(ctx, rest, settings.guild_id.clone());

    let outcome = tokio::select! {
        err = gateway::run(&gateway_config, &dispatcher) => {
            Err(anyhow::Error::new(err).context("discord gateway refused the bot"))
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for shutdown signal")?;
            info!("bot: shutting down");
            Ok(())
        }
    };
    health.abort();
    outcome
}

fn build_router() -> Router {
    Router::new().route("/healthz", get(healthz))
}

async fn healthz() -> &'static str {
    "ok"
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
