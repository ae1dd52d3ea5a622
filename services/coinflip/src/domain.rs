use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use shared::{Amount, CoinFace};
use uuid::Uuid;

/// One settled bet-and-flip transaction
///
/// Persisted as `{ts, choice, bet, outcome, win}` with `ts` in epoch millis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    #[serde(
        rename = "ts",
        alias = "timestamp",
        with = "chrono::serde::ts_milliseconds"
    )]
    pub timestamp: DateTime<Utc>,
    pub choice: CoinFace,
    pub bet: Amount,
    pub outcome: CoinFace,
    pub win: bool,
}

impl Round {
    pub fn settle(choice: CoinFace, bet: Amount, outcome: CoinFace) -> Self {
        Self {
            // storage keeps millisecond precision only
            timestamp: Utc::now().trunc_subsecs(3),
            choice,
            bet,
            outcome,
            win: outcome == choice,
        }
    }

    /// Signed balance change of the round, e.g. "+0.5" or "-1"
    pub fn net_display(&self) -> String {
        let sign = if self.win { '+' } else { '-' };
        format!("{}{}", sign, self.bet)
    }
}

/// Handle returned when a flip is placed; required to resolve it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlipTicket {
    pub flip_id: Uuid,
    pub stake: Amount,
    pub choice: CoinFace,
}

/// Flip whose stake is deducted but whose outcome is not applied yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PendingFlip {
    pub ticket: FlipTicket,
    pub placed_at: DateTime<Utc>,
}

/// The part of a session that survives a restart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSession {
    pub balance: Amount,
    pub history: Vec<Round>,
}

impl Default for PersistedSession {
    fn default() -> Self {
        Self {
            balance: Amount::STARTING_BALANCE,
            history: Vec::new(),
        }
    }
}

/// Read-only snapshot handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub balance: Amount,
    pub selected_bet: Amount,
    pub choice: CoinFace,
    pub pending: bool,
    pub can_play: bool,
    pub last_result: Option<CoinFace>,
    pub message: String,
    pub history_len: usize,
    pub history: Vec<Round>,
}
