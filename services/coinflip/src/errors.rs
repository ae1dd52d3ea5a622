use shared::{ValidationError, MSG_FLIP_IN_PROGRESS, MSG_INSUFFICIENT_BALANCE};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("{}", MSG_FLIP_IN_PROGRESS)]
    FlipInProgress,

    #[error("{}", MSG_INSUFFICIENT_BALANCE)]
    InsufficientBalance,

    #[error("No flip is pending")]
    NoPendingFlip,

    #[error("Flip {got} does not match the pending flip {expected}")]
    StaleFlip { expected: Uuid, got: Uuid },

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl SessionError {
    /// User-visible rejections that leave the session untouched apart from its message
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            SessionError::FlipInProgress | SessionError::InsufficientBalance
        )
    }

    /// Short label used for logs and metrics
    pub fn reason(&self) -> &'static str {
        match self {
            SessionError::FlipInProgress => "flip_in_progress",
            SessionError::InsufficientBalance => "insufficient_balance",
            SessionError::NoPendingFlip => "no_pending_flip",
            SessionError::StaleFlip { .. } => "stale_flip",
            SessionError::Validation(_) => "validation",
            SessionError::Redis(_) => "redis",
            SessionError::Io(_) => "io",
            SessionError::Serialization(_) => "serialization",
            SessionError::Internal(_) => "internal",
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
