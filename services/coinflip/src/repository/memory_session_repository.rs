//! In-process SessionRepository implementation
//!
//! Keeps the raw string entries in a map, exactly as a key-value store
//! would, so the codec fallbacks apply here too.

use async_trait::async_trait;
use shared::Amount;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::codec::{decode_session, encode_balance, encode_history};
use super::keys::StorageKeys;
use super::SessionRepository;
use crate::domain::{PersistedSession, Round};
use crate::errors::Result;

#[derive(Debug, Clone, Default)]
pub struct MemorySessionRepository {
    entries: Arc<Mutex<HashMap<String, String>>>,
    keys: StorageKeys,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys(keys: StorageKeys) -> Self {
        Self {
            entries: Arc::default(),
            keys,
        }
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Read a raw entry
    pub async fn get_raw(&self, key: &str) -> Option<String> {
        self.entries.lock().await.get(key).cloned()
    }

    /// Write a raw entry, bypassing the codec
    pub async fn put_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.lock().await.insert(key.into(), value.into());
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn load(&self) -> Result<PersistedSession> {
        let entries = self.entries.lock().await;
        Ok(decode_session(
            entries.get(&self.keys.balance).map(String::as_str),
            entries.get(&self.keys.history).map(String::as_str),
        ))
    }

    async fn save(&self, balance: Amount, history: &[Round]) -> Result<()> {
        let history = encode_history(history)?;
        let mut entries = self.entries.lock().await;
        entries.insert(self.keys.balance.clone(), encode_balance(balance));
        entries.insert(self.keys.history.clone(), history);
        Ok(())
    }
}
