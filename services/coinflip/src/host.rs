//! Line-oriented terminal presentation of a session
//!
//! Parses user intents and renders the read-only session view. Timing of
//! the flip lives in the binary; nothing here touches the session.

use chrono::Local;
use shared::{BetOption, CoinFace};
use std::str::FromStr;

use crate::domain::{Round, SessionView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    SelectBet(BetOption),
    SelectChoice(CoinFace),
    Flip,
    Reset,
    Show,
    History,
    Help,
    Quit,
}

impl FromStr for Intent {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let command = words.next().unwrap_or_default().to_ascii_lowercase();
        let argument = words.next();
        if words.next().is_some() {
            anyhow::bail!("Unexpected arguments in {:?}, type `help`", s.trim());
        }

        let intent = match (command.as_str(), argument) {
            ("bet", Some(amount)) => Intent::SelectBet(amount.parse()?),
            ("bet", None) => anyhow::bail!("Usage: bet <0.1|0.5|1>"),
            ("heads" | "h", None) => Intent::SelectChoice(CoinFace::Heads),
            ("tails" | "t", None) => Intent::SelectChoice(CoinFace::Tails),
            ("flip" | "f", None) => Intent::Flip,
            ("reset", None) => Intent::Reset,
            ("show" | "", None) => Intent::Show,
            ("history", None) => Intent::History,
            ("help" | "?", None) => Intent::Help,
            ("quit" | "exit" | "q", None) => Intent::Quit,
            _ => anyhow::bail!("Unknown command {:?}, type `help`", s.trim()),
        };
        Ok(intent)
    }
}

pub fn render_help() -> String {
    [
        "Coin Flip: choose bet 0.1 / 0.5 / 1 point, select a face, flip to win x2",
        "  bet <0.1|0.5|1>  select the stake",
        "  heads | tails    select the face",
        "  flip             flip the coin",
        "  reset            restore 10 points and clear history",
        "  show | history   display state or recent games",
        "  quit",
    ]
    .join("\n")
}

pub fn render_view(view: &SessionView) -> String {
    let mut out = format!(
        "Balance: {} pt | Bet: {} | Face: {} | Recent games: {}",
        view.balance, view.selected_bet, view.choice, view.history_len
    );

    if view.pending {
        out.push_str("\nFlipping...");
    } else if let Some(result) = view.last_result {
        out.push_str(&format!("\nResult: {}", face_label(result)));
    }
    if !view.message.is_empty() {
        out.push_str(&format!("\n{}", view.message));
    }
    out
}

pub fn render_history(history: &[Round]) -> String {
    if history.is_empty() {
        return "No games yet. Try your luck!".to_string();
    }

    history
        .iter()
        .map(|round| {
            format!(
                "{}  Bet {:<4} {:<5} {}",
                round.timestamp.with_timezone(&Local).format("%H:%M:%S"),
                round.bet.to_string(),
                round.net_display(),
                face_label(round.outcome)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn face_label(face: CoinFace) -> &'static str {
    match face {
        CoinFace::Heads => "Heads (H)",
        CoinFace::Tails => "Tails (T)",
    }
}
