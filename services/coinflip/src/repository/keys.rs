//! Storage key generation
//!
//! The session lives under two independent keys so either may be missing on
//! first run. A namespace lets several sessions share one store.

use shared::{BALANCE_STORAGE_KEY, HISTORY_STORAGE_KEY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub balance: String,
    pub history: String,
}

impl StorageKeys {
    /// Keys prefixed with `namespace:`; an empty namespace gives the bare keys
    pub fn new(namespace: &str) -> Self {
        Self {
            balance: namespaced(namespace, BALANCE_STORAGE_KEY),
            history: namespaced(namespace, HISTORY_STORAGE_KEY),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new("")
    }
}

fn namespaced(namespace: &str, key: &str) -> String {
    if namespace.is_empty() {
        key.to_string()
    } else {
        format!("{}:{}", namespace, key)
    }
}
