use std::{collections::HashMap, fmt, sync::Arc, time::Duration};

use shared::domain::{Project, StoreItem, User};
use tokio::{sync::Mutex, time::Instant};
use tracing::debug;
use uuid::Uuid;

use crate::navigation::{CategoryCursor, PageCursor, StoreCatalog};

pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::try_parse(raw)
            .ok()
            .map(|uuid| Self(uuid.simple().to_string()))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Projects,
    Users,
    Devlogs,
}

impl SearchKind {
    pub fn empty_message(self) -> &'static str {
        match self {
            SearchKind::Projects => "No projects found.",
            SearchKind::Users => "No users found.",
            SearchKind::Devlogs => "No devlogs found.",
        }
    }
}

/// State bound to one delivered interactive message.
#[derive(Debug, Clone)]
pub enum Session {
    Search {
        kind: SearchKind,
        query: Option<String>,
        cursor: PageCursor,
    },
    Store {
        catalog: Arc<StoreCatalog>,
        cursor: CategoryCursor,
    },
    Project(Project),
    User(User),
    StoreItem(StoreItem),
}

struct Entry {
    session: Session,
    expires_at: Instant,
}

/// In-memory sessions keyed by the id embedded in their controls. A session
/// expires a fixed time after it was opened, however often it is used.
pub struct SessionRegistry {
    timeout: Duration,
    entries: Mutex<HashMap<SessionId, Entry>>,
}

impl SessionRegistry {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn open(&self, session: Session) -> SessionId {
        let now = Instant::now();
        let id = SessionId::generate();
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        if entries.len() != before {
            debug!(purged = before - entries.len(), "sessions: purged expired");
        }
        entries.insert(
            id.clone(),
            Entry {
                session,
                expires_at: now + self.timeout,
            },
        );
        id
    }

    pub async fn get(&self, id: &SessionId) -> Option<Session> {
        let mut entries = self.entries.lock().await;
        let expired = entries.get(id)?.expires_at <= Instant::now();
        if expired {
            entries.remove(id);
            return None;
        }
        entries.get(id).map(|entry| entry.session.clone())
    }

    /// Replaces the state of a live session without extending its lifetime.
    /// Returns `false` when the session is gone.
    pub async fn update(&self, id: &SessionId, session: Session) -> bool {
        let mut entries = self.entries.lock().await;
        match entries.get_mut(id) {
            Some(entry) if entry.expires_at > Instant::now() => {
                entry.session = session;
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    pub async fn close(&self, id: &SessionId) {
        self.entries.lock().await.remove(id);
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_session(page: u32) -> Session {
        Session::Search {
            kind: SearchKind::Projects,
            query: Some("cookie".into()),
            cursor: PageCursor::new(page, 5),
        }
    }

    #[test]
    fn session_ids_round_trip_through_text() {
        let id = SessionId::generate();
        assert_eq!(SessionId::parse(&id.to_string()), Some(id));
        assert_eq!(SessionId::parse("nope"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn sessions_expire_after_timeout_even_when_updated() {
        let registry = SessionRegistry::new(Duration::from_secs(180));
        let id = registry.open(search_session(1)).await;

        tokio::time::advance(Duration::from_secs(120)).await;
        assert!(registry.update(&id, search_session(2)).await);
        match registry.get(&id).await {
            Some(Session::Search { cursor, .. }) => assert_eq!(cursor.current(), 2),
            other => panic!("unexpected session: {other:?}"),
        }

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(registry.get(&id).await.is_none());
        assert!(!registry.update(&id, search_session(3)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn opening_purges_expired_sessions() {
        let registry = SessionRegistry::new(Duration::from_secs(10));
        let stale = registry.open(search_session(1)).await;
        tokio::time::advance(Duration::from_secs(11)).await;

        let fresh = registry.open(search_session(1)).await;
        assert_eq!(registry.len().await, 1);
        assert!(registry.get(&stale).await.is_none());
        assert!(registry.get(&fresh).await.is_some());

        registry.close(&fresh).await;
        assert_eq!(registry.len().await, 0);
    }
}
