//! Server-side administrator sessions
//!
//! The browser only holds a signed session id; the session record itself
//! (badge number and expiry) lives in a [`SessionStore`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::AppResult;

/// A logged-in administrator session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub matricula: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(matricula: &str, max_age: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            matricula: matricula.to_string(),
            created_at: now,
            expires_at: now + max_age,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Remaining lifetime, zero when already expired
    pub fn ttl(&self) -> Duration {
        (self.expires_at - Utc::now()).max(Duration::zero())
    }
}

/// Storage backend for sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save(&self, session: &Session) -> AppResult<()>;

    async fn load(&self, id: Uuid) -> AppResult<Option<Session>>;

    async fn remove(&self, id: Uuid) -> AppResult<()>;
}

/// Process-local session store, for single-node deployments and tests
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, session: &Session) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        // Drop stale entries while holding the lock anyway
        let now = Utc::now();
        sessions.retain(|_, s| !s.is_expired_at(now));
        sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn load(&self, id: Uuid) -> AppResult<Option<Session>> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn remove(&self, id: Uuid) -> AppResult<()> {
        self.sessions.write().await.remove(&id);
        Ok(())
    }
}

/// Issues, resolves and ends administrator sessions
#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn SessionStore>,
    max_age: Duration,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>, max_age: Duration) -> Self {
        Self { store, max_age }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Open a new session for an authenticated administrator
    pub async fn start(&self, matricula: &str) -> AppResult<Session> {
        let session = Session::new(matricula, self.max_age);
        self.store.save(&session).await?;
        tracing::debug!(session_id = %session.id, "Session started");
        Ok(session)
    }

    /// Look up a live session; expired sessions are removed and reported as absent
    pub async fn resolve(&self, id: Uuid) -> AppResult<Option<Session>> {
        match self.store.load(id).await? {
            Some(session) if session.is_expired_at(Utc::now()) => {
                self.store.remove(id).await?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    pub async fn end(&self, id: Uuid) -> AppResult<()> {
        self.store.remove(id).await?;
        tracing::debug!(session_id = %id, "Session ended");
        Ok(())
    }
}
