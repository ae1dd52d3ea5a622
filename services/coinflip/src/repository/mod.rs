//! Persistence of the session balance and history
//!
//! Every backend stores the same two string entries (see [`keys`]) and
//! shares one [`codec`], so malformed data degrades to defaults identically.

pub mod codec;
pub mod file_session_repository;
pub mod keys;
pub mod memory_session_repository;
pub mod redis_session_repository;

use async_trait::async_trait;
use shared::Amount;
use std::sync::Arc;

use crate::config::{StoreBackend, StoreConfig};
use crate::domain::{PersistedSession, Round};
use crate::errors::Result;

pub use file_session_repository::FileSessionRepository;
pub use keys::StorageKeys;
pub use memory_session_repository::MemorySessionRepository;
pub use redis_session_repository::RedisSessionRepository;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Load balance and history; absent or malformed entries yield defaults
    async fn load(&self) -> Result<PersistedSession>;

    /// Store balance and the most recent rounds (capped to the history limit)
    async fn save(&self, balance: Amount, history: &[Round]) -> Result<()>;
}

/// Build the repository selected by configuration
pub async fn from_config(config: &StoreConfig) -> Result<Arc<dyn SessionRepository>> {
    let keys = StorageKeys::new(&config.namespace);
    let repository: Arc<dyn SessionRepository> = match config.backend {
        StoreBackend::File => Arc::new(FileSessionRepository::new(config.path.clone(), keys)),
        StoreBackend::Redis => {
            Arc::new(RedisSessionRepository::connect(&config.redis_url, keys).await?)
        }
        StoreBackend::Memory => Arc::new(MemorySessionRepository::with_keys(keys)),
    };

    tracing::info!(backend = ?config.backend, "Session store ready");
    Ok(repository)
}
