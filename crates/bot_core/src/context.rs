use std::{sync::Arc, time::Duration};

use flavortown_client::TrackerApi;

use crate::{
    lifecycle::{ChatPlatform, InteractionLifecycle, InteractionRef, DEFAULT_RETIRE_AFTER},
    navigation::DEFAULT_ITEMS_PER_PAGE,
    session::{SessionRegistry, DEFAULT_SESSION_TIMEOUT},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotSettings {
    pub retire_after: Duration,
    pub session_timeout: Duration,
    pub store_items_per_page: usize,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            retire_after: DEFAULT_RETIRE_AFTER,
            session_timeout: DEFAULT_SESSION_TIMEOUT,
            store_items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

/// Everything a handler needs, built once at startup and shared by every
/// interaction task.
#[derive(Clone)]
pub struct AppContext {
    pub api: Arc<dyn TrackerApi>,
    pub platform: Arc<dyn ChatPlatform>,
    pub sessions: Arc<SessionRegistry>,
    pub settings: BotSettings,
}

impl AppContext {
    pub fn new(
        api: Arc<dyn TrackerApi>,
        platform: Arc<dyn ChatPlatform>,
        settings: BotSettings,
    ) -> Self {
        Self {
            api,
            platform,
            sessions: Arc::new(SessionRegistry::new(settings.session_timeout)),
            settings,
        }
    }

    pub fn lifecycle(&self, interaction: InteractionRef) -> InteractionLifecycle {
        InteractionLifecycle::new(
            Arc::clone(&self.platform),
            interaction,
            self.settings.retire_after,
        )
    }
}
