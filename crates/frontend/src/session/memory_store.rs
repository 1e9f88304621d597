//! In-process session store, used without Redis and in tests.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use common::AppResult;

use super::{PendingLogin, Session, SessionStore};

/// Session store backed by in-memory maps with per-entry expiry.
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, (Session, Instant)>>,
    pending: RwLock<HashMap<String, (PendingLogin, Instant)>>,
    session_ttl: Duration,
    pending_ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(session_ttl: Duration, pending_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            pending: RwLock::new(HashMap::new()),
            session_ttl,
            pending_ttl,
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(1800), Duration::from_secs(300))
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &str) -> AppResult<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(id)
            .filter(|(_, expires)| *expires > Instant::now())
            .map(|(session, _)| session.clone()))
    }

    async fn save(&self, session: &Session) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        sessions.retain(|_, (_, expires)| *expires > now);
        sessions.insert(session.id.clone(), (session.clone(), now + self.session_ttl));
        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.sessions.write().await.remove(id);
        Ok(())
    }

    async fn save_pending(&self, pending: &PendingLogin) -> AppResult<()> {
        let mut logins = self.pending.write().await;
        let now = Instant::now();
        logins.retain(|_, (_, expires)| *expires > now);
        logins.insert(pending.state.clone(), (pending.clone(), now + self.pending_ttl));
        Ok(())
    }

    async fn take_pending(&self, state: &str) -> AppResult<Option<PendingLogin>> {
        let mut logins = self.pending.write().await;
        Ok(logins
            .remove(state)
            .filter(|(_, expires)| *expires > Instant::now())
            .map(|(pending, _)| pending))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TokenSet;
    use chrono::Utc;
    use domain::Identity;

    fn session() -> Session {
        Session::new(
            Identity::new("demo_user_1", Vec::new()),
            TokenSet {
                access_token: "access".to_string(),
                refresh_token: None,
                id_token: None,
                expires_at: Utc::now() + chrono::Duration::minutes(5),
            },
        )
    }

    #[tokio::test]
    async fn test_save_load_delete() {
        let store = MemorySessionStore::default();
        let session = session();

        store.save(&session).await.unwrap();
        assert_eq!(store.load(&session.id).await.unwrap(), Some(session.clone()));

        store.delete(&session.id).await.unwrap();
        assert_eq!(store.load(&session.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_pending_login_is_single_use() {
        let store = MemorySessionStore::default();
        let pending = PendingLogin::new();

        store.save_pending(&pending).await.unwrap();

        assert_eq!(store.take_pending(&pending.state).await.unwrap(), Some(pending.clone()));
        assert_eq!(store.take_pending(&pending.state).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_session_is_gone() {
        let store = MemorySessionStore::new(Duration::ZERO, Duration::ZERO);
        let session = session();

        store.save(&session).await.unwrap();

        assert_eq!(store.load(&session.id).await.unwrap(), None);
    }
}
