//! File-backed SessionRepository implementation
//!
//! The file holds one JSON object of string entries, the same shape a
//! browser's local storage would have. Writes go to a temporary file that
//! is renamed over the original so a crash never leaves a torn file.

use async_trait::async_trait;
use shared::Amount;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::codec::{decode_session, encode_balance, encode_history};
use super::keys::StorageKeys;
use super::SessionRepository;
use crate::domain::{PersistedSession, Round};
use crate::errors::Result;

type Entries = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct FileSessionRepository {
    path: PathBuf,
    keys: StorageKeys,
}

impl FileSessionRepository {
    pub fn new(path: impl Into<PathBuf>, keys: StorageKeys) -> Self {
        Self {
            path: path.into(),
            keys,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all entries; a missing file is an empty store
    async fn read_entries(&self) -> Result<Entries> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Entries::new());
        }

        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Store file is malformed, treating it as empty"
                );
                Ok(Entries::new())
            }
        }
    }

    async fn write_entries(&self, entries: &Entries) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.temp_path();
        tokio::fs::write(&tmp_path, content.as_bytes()).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SessionRepository for FileSessionRepository {
    async fn load(&self) -> Result<PersistedSession> {
        let entries = self.read_entries().await?;
        Ok(decode_session(
            entries.get(&self.keys.balance).map(String::as_str),
            entries.get(&self.keys.history).map(String::as_str),
        ))
    }

    async fn save(&self, balance: Amount, history: &[Round]) -> Result<()> {
        // Keep entries written under other namespaces
        let mut entries = self.read_entries().await?;
        entries.insert(self.keys.balance.clone(), encode_balance(balance));
        entries.insert(self.keys.history.clone(), encode_history(history)?);
        self.write_entries(&entries).await?;

        tracing::trace!(path = %self.path.display(), "Session saved to file");
        Ok(())
    }
}
