//! Server-side browser sessions.
//!
//! The browser only holds an opaque session id cookie; identity, tokens and
//! the CSRF token live in the session store.

mod memory_store;
mod redis_store;

pub use memory_store::MemorySessionStore;
pub use redis_store::RedisSessionStore;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::AppResult;
use domain::{has_role, Identity, ROLE_LIBRARIAN};

use crate::clients::AccessToken;

/// Name of the session id cookie.
pub const SESSION_COOKIE: &str = "LIBRARY_SESSION";

/// Tokens obtained from the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSet {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl TokenSet {
    /// True when the access token expires within `skew` from now.
    pub fn expires_within(&self, skew: Duration) -> bool {
        self.expires_at <= Utc::now() + skew
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// An authenticated browser session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub identity: Identity,
    pub tokens: TokenSet,
    pub csrf_token: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// New session with a fresh id and CSRF token.
    pub fn new(identity: Identity, tokens: TokenSet) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            identity,
            tokens,
            csrf_token: random_token(43),
            created_at: Utc::now(),
        }
    }

    pub fn user_name(&self) -> &str {
        &self.identity.user_name
    }

    pub fn is_librarian(&self) -> bool {
        has_role(&self.identity, ROLE_LIBRARIAN)
    }

    pub fn access_token(&self) -> AccessToken {
        AccessToken::new(self.tokens.access_token.clone())
    }
}

/// State kept between the login redirect and the callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingLogin {
    pub state: String,
    pub pkce_verifier: String,
    pub nonce: String,
    pub created_at: DateTime<Utc>,
}

impl PendingLogin {
    pub fn new() -> Self {
        Self {
            state: random_token(32),
            pkce_verifier: random_token(64),
            nonce: random_token(32),
            created_at: Utc::now(),
        }
    }
}

impl Default for PendingLogin {
    fn default() -> Self {
        Self::new()
    }
}

/// Session storage trait for dependency injection.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a live session
    async fn load(&self, id: &str) -> AppResult<Option<Session>>;

    /// Create or replace a session, resetting its TTL
    async fn save(&self, session: &Session) -> AppResult<()>;

    /// Delete a session; deleting an unknown id is not an error
    async fn delete(&self, id: &str) -> AppResult<()>;

    /// Store a pending login under its `state`
    async fn save_pending(&self, pending: &PendingLogin) -> AppResult<()>;

    /// Remove and return the pending login for `state` (single use)
    async fn take_pending(&self, state: &str) -> AppResult<Option<PendingLogin>>;

    /// Check connectivity
    async fn ping(&self) -> AppResult<()>;

    /// Backing store name, as reported by `/health`
    fn kind(&self) -> &'static str;
}

/// Random URL-safe token.
pub(crate) fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
