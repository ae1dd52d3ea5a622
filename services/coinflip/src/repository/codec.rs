//! Encoding of the persisted session entries
//!
//! Balance is stored as a decimal string, history as a JSON array of rounds.
//! Missing or malformed values decode to the defaults instead of failing.

use shared::{Amount, HISTORY_LIMIT};

use crate::domain::{PersistedSession, Round};
use crate::errors::Result;

pub fn encode_balance(balance: Amount) -> String {
    balance.to_string()
}

pub fn encode_history(history: &[Round]) -> Result<String> {
    let bounded = &history[..history.len().min(HISTORY_LIMIT)];
    Ok(serde_json::to_string(bounded)?)
}

/// Parse a stored balance, falling back to the starting balance
pub fn decode_balance(raw: Option<&str>) -> Amount {
    let Some(raw) = raw.filter(|v| !v.trim().is_empty()) else {
        return Amount::STARTING_BALANCE;
    };

    match raw.parse::<Amount>() {
        Ok(balance) => balance,
        Err(e) => {
            tracing::warn!(error = %e, "Stored balance is malformed, using starting balance");
            Amount::STARTING_BALANCE
        }
    }
}

/// Parse stored history, skipping malformed rounds and capping the length
pub fn decode_history(raw: Option<&str>) -> Vec<Round> {
    let Some(raw) = raw.filter(|v| !v.trim().is_empty()) else {
        return Vec::new();
    };

    let entries: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "Stored history is malformed, starting with empty history");
            return Vec::new();
        }
    };

    let mut history = Vec::with_capacity(entries.len().min(HISTORY_LIMIT));
    for (index, entry) in entries.into_iter().enumerate() {
        if history.len() == HISTORY_LIMIT {
            break;
        }
        match serde_json::from_value::<Round>(entry) {
            Ok(round) => history.push(round),
            Err(e) => tracing::warn!(index, error = %e, "Skipping malformed history entry"),
        }
    }
    history
}

pub fn decode_session(balance: Option<&str>, history: Option<&str>) -> PersistedSession {
    PersistedSession {
        balance: decode_balance(balance),
        history: decode_history(history),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::CoinFace;

    fn sample_round(win: bool) -> Round {
        let outcome = if win { CoinFace::Heads } else { CoinFace::Tails };
        Round::settle(CoinFace::Heads, Amount::from_cents(50), outcome)
    }

    #[test]
    fn test_missing_entries_use_defaults() {
        let session = decode_session(None, None);
        assert_eq!(session, PersistedSession::default());
    }

    #[test]
    fn test_malformed_balance_uses_default() {
        assert_eq!(decode_balance(Some("lots")), Amount::STARTING_BALANCE);
        assert_eq!(decode_balance(Some("-4")), Amount::STARTING_BALANCE);
        assert_eq!(decode_balance(Some("NaN")), Amount::STARTING_BALANCE);
        assert_eq!(decode_balance(Some("")), Amount::STARTING_BALANCE);
        assert_eq!(decode_balance(Some("10.6")).cents(), 1_060);
        assert_eq!(decode_balance(Some("0")), Amount::ZERO);
    }

    #[test]
    fn test_malformed_history_uses_default() {
        assert!(decode_history(Some("{not json")).is_empty());
        assert!(decode_history(Some("{\"ts\":1}")).is_empty());
    }

    #[test]
    fn test_malformed_history_entries_are_skipped() {
        let good = serde_json::to_value(sample_round(true)).unwrap();
        let raw = serde_json::json!([good, {"ts": "yesterday"}, good]).to_string();

        let history = decode_history(Some(&raw));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_history_capped_on_encode_and_decode() {
        let history = vec![sample_round(false); HISTORY_LIMIT + 10];

        let encoded = encode_history(&history).unwrap();
        let stored: Vec<serde_json::Value> = serde_json::from_str(&encoded).unwrap();
        assert_eq!(stored.len(), HISTORY_LIMIT);

        let oversized = serde_json::to_string(&history).unwrap();
        assert_eq!(decode_history(Some(&oversized)).len(), HISTORY_LIMIT);
    }

    #[test]
    fn test_round_trip_is_identical() {
        let balance = Amount::from_cents(1_234);
        let history = vec![sample_round(true), sample_round(false)];

        let decoded = decode_session(
            Some(&encode_balance(balance)),
            Some(&encode_history(&history).unwrap()),
        );

        assert_eq!(decoded.balance, balance);
        assert_eq!(decoded.history, history);
    }
}
