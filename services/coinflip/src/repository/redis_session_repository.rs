//! Redis-based SessionRepository implementation
//!
//! Balance and history are plain Redis string keys. Both are written in one
//! atomic pipeline so a reader never sees a balance without its history.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use shared::Amount;

use super::codec::{decode_session, encode_balance, encode_history};
use super::keys::StorageKeys;
use super::SessionRepository;
use crate::domain::{PersistedSession, Round};
use crate::errors::Result;

pub struct RedisSessionRepository {
    redis: ConnectionManager,
    keys: StorageKeys,
}

impl RedisSessionRepository {
    /// Create a new RedisSessionRepository
    pub fn new(redis: ConnectionManager, keys: StorageKeys) -> Self {
        Self { redis, keys }
    }

    /// Open a managed connection to `url`
    pub async fn connect(url: &str, keys: StorageKeys) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let redis = client.get_connection_manager().await?;
        tracing::info!("Redis connected");
        Ok(Self::new(redis, keys))
    }
}

#[async_trait]
impl SessionRepository for RedisSessionRepository {
    async fn load(&self) -> Result<PersistedSession> {
        let mut redis_conn = self.redis.clone();
        let (balance, history): (Option<String>, Option<String>) = redis::pipe()
            .get(&self.keys.balance)
            .get(&self.keys.history)
            .query_async(&mut redis_conn)
            .await?;

        Ok(decode_session(balance.as_deref(), history.as_deref()))
    }

    async fn save(&self, balance: Amount, history: &[Round]) -> Result<()> {
        let history = encode_history(history)?;
        let mut redis_conn = self.redis.clone();

        let mut pipe = redis::pipe();
        pipe.atomic();
        let _: () = pipe
            .set(&self.keys.balance, encode_balance(balance))
            .ignore()
            .set(&self.keys.history, history)
            .ignore()
            .query_async(&mut redis_conn)
            .await?;

        Ok(())
    }
}
