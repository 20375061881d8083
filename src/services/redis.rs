//! Redis-backed session store

use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use uuid::Uuid;

use super::sessions::{Session, SessionStore};
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct RedisSessionStore {
    client: Client,
}

impl RedisSessionStore {
    /// Create a new Redis session store and check the connection
    pub async fn new(url: &str) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;

        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Unavailable(format!("Failed to connect to Redis: {}", e)))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Unavailable(format!("Redis connection test failed: {}", e)))?;

        Ok(Self { client })
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Unavailable(format!("Failed to get Redis connection: {}", e)))
    }

    fn key(id: Uuid) -> String {
        format!("session:{}", id)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn save(&self, session: &Session) -> AppResult<()> {
        let mut conn = self.connection().await?;

        let payload = serde_json::to_string(session)
            .map_err(|e| AppError::Internal(format!("Failed to serialize session: {}", e)))?;
        let ttl = session.ttl().num_seconds().max(1) as u64;

        conn.set_ex::<_, _, ()>(Self::key(session.id), payload, ttl)
            .await
            .map_err(|e| AppError::Unavailable(format!("Failed to store session in Redis: {}", e)))?;

        Ok(())
    }

    async fn load(&self, id: Uuid) -> AppResult<Option<Session>> {
        let mut conn = self.connection().await?;

        let payload: Option<String> = conn
            .get(Self::key(id))
            .await
            .map_err(|e| AppError::Unavailable(format!("Failed to read session from Redis: {}", e)))?;

        match payload {
            Some(payload) => {
                let session = serde_json::from_str(&payload)
                    .map_err(|e| AppError::Internal(format!("Corrupted session record: {}", e)))?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, id: Uuid) -> AppResult<()> {
        let mut conn = self.connection().await?;

        let _: () = conn
            .del(Self::key(id))
            .await
            .map_err(|e| AppError::Unavailable(format!("Failed to delete session from Redis: {}", e)))?;

        Ok(())
    }
}
