// Library interface for the coin flip wager game - exposes modules for hosts and tests

pub mod config;
pub mod domain;
pub mod errors;
pub mod host;
pub mod randomness;
pub mod repository;
pub mod services;
pub mod session;

pub use domain::{FlipTicket, PendingFlip, PersistedSession, Round, SessionView};
pub use errors::{Result, SessionError};
pub use randomness::{RandomnessSource, ScriptedRandomness, SecureRandomness};
pub use repository::{
    FileSessionRepository, MemorySessionRepository, RedisSessionRepository, SessionRepository,
    StorageKeys,
};
pub use services::WagerService;
pub use session::WagerSession;
