use anyhow::Context;
use serde::Deserialize;
use shared::DEFAULT_FLIP_DELAY_MS;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    pub game: GameConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub path: PathBuf,
    pub redis_url: String,
    pub namespace: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    File,
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StoreBackend::File),
            "redis" => Ok(StoreBackend::Redis),
            "memory" => Ok(StoreBackend::Memory),
            other => anyhow::bail!("Unknown store backend {:?} (expected file, redis or memory)", other),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    /// How long the host lets the coin spin before resolving a flip
    pub flip_delay_ms: u64,
}

impl GameConfig {
    pub fn flip_delay(&self) -> Duration {
        Duration::from_millis(self.flip_delay_ms)
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            store: StoreConfig {
                backend: env::var("STORE_BACKEND")
                    .unwrap_or_else(|_| "file".to_string())
                    .parse()?,
                path: env::var("STORE_PATH")
                    .unwrap_or_else(|_| "coinflip-store.json".to_string())
                    .into(),
                redis_url: env::var("REDIS_URL")
                    .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
                namespace: env::var("STORE_NAMESPACE").unwrap_or_default(),
            },
            game: GameConfig {
                flip_delay_ms: env::var("FLIP_DELAY_MS")
                    .unwrap_or_else(|_| DEFAULT_FLIP_DELAY_MS.to_string())
                    .parse()
                    .context("FLIP_DELAY_MS must be a whole number of milliseconds")?,
            },
        })
    }
}
