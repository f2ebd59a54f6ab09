use std::{collections::HashMap, env, fmt, fs, path::Path, str::FromStr, time::Duration};

use bot_core::BotSettings;
use discord::{gateway::DEFAULT_GATEWAY_URL, rest::DEFAULT_API_BASE};
use flavortown_client::DEFAULT_BASE_URL;
use thiserror::Error;
use tracing::warn;

pub const CONFIG_FILE: &str = "bot.toml";

#[derive(Clone)]
pub struct Settings {
    pub discord_token: Option<String>,
    pub flavortown_api_key: Option<String>,
    pub flavortown_base_url: String,
    pub discord_api_base: String,
    pub gateway_url: String,
    pub guild_id: Option<String>,
    pub health_bind: String,
    pub auto_delete_seconds: u64,
    pub session_timeout_seconds: u64,
    pub store_items_per_page: usize,
}

impl Default for Settings {
    fn default() -> Self {
        let bot = BotSettings::default();
        Self {
            discord_token: None,
            flavortown_api_key: None,
            flavortown_base_url: DEFAULT_BASE_URL.into(),
            discord_api_base: DEFAULT_API_BASE.into(),
            gateway_url: DEFAULT_GATEWAY_URL.into(),
            guild_id: None,
            health_bind: "127.0.0.1:8080".into(),
            auto_delete_seconds: bot.retire_after.as_secs(),
            session_timeout_seconds: bot.session_timeout.as_secs(),
            store_items_per_page: bot.store_items_per_page,
        }
    }
}

fn redact(secret: &Option<String>) -> &'static str {
    if secret.is_some() {
        "<redacted>"
    } else {
        "<unset>"
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("discord_token", &redact(&self.discord_token))
            .field("flavortown_api_key", &redact(&self.flavortown_api_key))
            .field("flavortown_base_url", &self.flavortown_base_url)
            .field("discord_api_base", &self.discord_api_base)
            .field("gateway_url", &self.gateway_url)
            .field("guild_id", &self.guild_id)
            .field("health_bind", &self.health_bind)
            .field("auto_delete_seconds", &self.auto_delete_seconds)
            .field("session_timeout_seconds", &self.session_timeout_seconds)
            .field("store_items_per_page", &self.store_items_per_page)
            .finish()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
}

pub struct Credentials {
    pub discord_token: String,
    pub flavortown_api_key: String,
}

impl Settings {
    /// Both secrets the bot cannot run without.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        Ok(Credentials {
            discord_token: self.discord_token()?,
            flavortown_api_key: self.flavortown_api_key()?,
        })
    }

    pub fn discord_token(&self) -> Result<String, ConfigError> {
        required(&self.discord_token, "DISCORD_TOKEN")
    }

    pub fn flavortown_api_key(&self) -> Result<String, ConfigError> {
        required(&self.flavortown_api_key, "FLAVORTOWN_API_KEY")
    }

    pub fn bot_settings(&self) -> BotSettings {
        BotSettings {
            retire_after: Duration::from_secs(self.auto_delete_seconds),
            session_timeout: Duration::from_secs(self.session_timeout_seconds),
            store_items_per_page: self.store_items_per_page.max(1),
        }
    }
}

fn required(value: &Option<String>, name: &'static str) -> Result<String, ConfigError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(ConfigError::Missing(name))
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(CONFIG_FILE), |name| env::var(name).ok())
}

/// Defaults, then the optional config file, then the environment. Every
/// environment key also has an `APP__` alias that wins over the plain name.
pub fn load_settings_from(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => apply(&mut settings, |key| file_cfg.get(key).cloned()),
            Err(err) => warn!(path = %path.display(), %err, "config: ignoring unreadable file"),
        }
    }

    apply(&mut settings, |key| {
        let name = key.to_uppercase();
        lookup(&format!("APP__{name}")).or_else(|| lookup(&name))
    });
    settings
}

fn apply(settings: &mut Settings, source: impl Fn(&str) -> Option<String>) {
    if let Some(v) = source("discord_token") {
        settings.discord_token = Some(v);
    }
    if let Some(v) = source("flavortown_api_key") {
        settings.flavortown_api_key = Some(v);
    }
    if let Some(v) = source("flavortown_base_url") {
        settings.flavortown_base_url = v;
    }
    if let Some(v) = source("discord_api_base") {
        settings.discord_api_base = v;
    }
    if let Some(v) = source("discord_gateway_url") {
        settings.gateway_url = v;
    }
    if let Some(v) = source("discord_guild_id") {
        settings.guild_id = Some(v).filter(|id| !id.trim().is_empty());
    }
    if let Some(v) = source("health_bind") {
        settings.health_bind = v;
    }
    parse_into(&source, "auto_delete_seconds", &mut settings.auto_delete_seconds);
    parse_into(&source, "session_timeout_seconds", &mut settings.session_timeout_seconds);
    parse_into(&source, "store_items_per_page", &mut settings.store_items_per_page);
}

fn parse_into<T: FromStr>(source: &impl Fn(&str) -> Option<String>, key: &str, target: &mut T) {
    let Some(raw) = source(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(parsed) => *target = parsed,
        Err(_) => warn!(key, value = %raw, "config: ignoring unparseable value"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
