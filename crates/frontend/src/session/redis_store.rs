//! Redis-backed session store.
//!
//! Sessions and pending logins are stored as JSON with a TTL, so a restart
//! of the frontend keeps users signed in.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use serde::{de::DeserializeOwned, Serialize};

use common::{AppError, AppResult};

use super::{PendingLogin, Session, SessionStore};

const SESSION_PREFIX: &str = "library:session:";
const LOGIN_PREFIX: &str = "library:login:";

/// Session store over a shared Redis connection manager.
#[derive(Clone)]
pub struct RedisSessionStore {
    connection: ConnectionManager,
    session_ttl: u64,
    pending_ttl: u64,
}

impl RedisSessionStore {
    /// Connect to Redis at `url`.
    pub async fn connect(url: &str, session_ttl: u64, pending_ttl: u64) -> AppResult<Self> {
        let client = Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis session store connected");

        Ok(Self {
            connection,
            session_ttl,
            pending_ttl,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;
        value.map(|json| parse(&json)).transpose()
    }

    async fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl: u64) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::internal(format!("Session serialization error: {}", e)))?;
        conn.set_ex::<_, _, ()>(key, json, ttl).await?;
        Ok(())
    }
}

fn parse<T: DeserializeOwned>(json: &str) -> AppResult<T> {
    serde_json::from_str(json)
        .map_err(|e| AppError::internal(format!("Session deserialization error: {}", e)))
}

fn session_key(id: &str) -> String {
    format!("{}{}", SESSION_PREFIX, id)
}

fn login_key(state: &str) -> String {
    format!("{}{}", LOGIN_PREFIX, state)
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, id: &str) -> AppResult<Option<Session>> {
        self.get_json(&session_key(id)).await
    }

    async fn save(&self, session: &Session) -> AppResult<()> {
        self.set_json(&session_key(&session.id), session, self.session_ttl)
            .await
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(session_key(id)).await?;
        Ok(())
    }

    async fn save_pending(&self, pending: &PendingLogin) -> AppResult<()> {
        self.set_json(&login_key(&pending.state), pending, self.pending_ttl)
            .await
    }

    async fn take_pending(&self, state: &str) -> AppResult<Option<PendingLogin>> {
        let mut conn = self.connection.clone();
        // GETDEL keeps the state single-use across frontend replicas
        let value: Option<String> = redis::cmd("GETDEL")
            .arg(login_key(state))
            .query_async(&mut conn)
            .await?;
        value.map(|json| parse(&json)).transpose()
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "redis"
    }
}
