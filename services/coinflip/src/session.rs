//! Wager session state machine
//!
//! `Idle -> place_flip -> Pending -> resolve_flip -> Idle`
//!
//! The stake is deducted when the flip is placed. Resolution is a separate,
//! caller-driven step so hosts own the animation delay and tests never wait
//! on a clock.

use chrono::Utc;
use shared::{Amount, BetOption, CoinFace, HISTORY_LIMIT, WIN_PAYOUT_MULTIPLIER};
use std::collections::VecDeque;
use uuid::Uuid;

use crate::domain::{FlipTicket, PendingFlip, PersistedSession, Round, SessionView};
use crate::errors::{Result, SessionError};
use crate::randomness::RandomnessSource;

#[derive(Debug, Clone)]
pub struct WagerSession {
    balance: Amount,
    selected_bet: BetOption,
    choice: CoinFace,
    pending: Option<PendingFlip>,
    last_result: Option<CoinFace>,
    message: String,
    history: VecDeque<Round>,
}

impl Default for WagerSession {
    fn default() -> Self {
        Self::from_persisted(PersistedSession::default())
    }
}

impl WagerSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a session from stored balance and history (most recent first)
    pub fn from_persisted(persisted: PersistedSession) -> Self {
        let mut history: VecDeque<Round> = persisted.history.into();
        history.truncate(HISTORY_LIMIT);

        Self {
            balance: persisted.balance,
            selected_bet: BetOption::default(),
            choice: CoinFace::default(),
            pending: None,
            last_result: None,
            message: String::new(),
            history,
        }
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn selected_bet(&self) -> BetOption {
        self.selected_bet
    }

    pub fn choice(&self) -> CoinFace {
        self.choice
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingFlip> {
        self.pending.as_ref()
    }

    pub fn last_result(&self) -> Option<CoinFace> {
        self.last_result
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Settled rounds, most recent first
    pub fn history(&self) -> &VecDeque<Round> {
        &self.history
    }

    pub fn can_play(&self) -> bool {
        !self.is_pending() && self.balance >= self.selected_bet.amount()
    }

    pub fn persisted(&self) -> PersistedSession {
        PersistedSession {
            balance: self.balance,
            history: self.history.iter().cloned().collect(),
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            balance: self.balance,
            selected_bet: self.selected_bet.amount(),
            choice: self.choice,
            pending: self.is_pending(),
            can_play: self.can_play(),
            last_result: self.last_result,
            message: self.message.clone(),
            history_len: self.history.len(),
            history: self.history.iter().cloned().collect(),
        }
    }

    /// Only affects the next flip, never the one in flight
    pub fn select_bet(&mut self, bet: BetOption) {
        self.selected_bet = bet;
    }

    /// Only affects the next flip, never the one in flight
    pub fn select_choice(&mut self, face: CoinFace) {
        self.choice = face;
    }

    /// Deduct the selected stake and enter the pending state
    ///
    /// Rejections only update the message.
    pub fn place_flip(&mut self) -> Result<FlipTicket> {
        if self.is_pending() {
            return Err(self.reject(SessionError::FlipInProgress));
        }

        let stake = self.selected_bet.amount();
        if self.balance < stake {
            return Err(self.reject(SessionError::InsufficientBalance));
        }
        let balance = self.balance.checked_sub(stake)?;

        let ticket = FlipTicket {
            flip_id: Uuid::new_v4(),
            stake,
            choice: self.choice,
        };
        self.balance = balance;
        self.pending = Some(PendingFlip {
            ticket,
            placed_at: Utc::now(),
        });
        self.last_result = None;
        self.message.clear();

        tracing::debug!(
            flip_id = %ticket.flip_id,
            stake = %stake,
            choice = %ticket.choice,
            balance = %self.balance,
            "Flip placed"
        );
        Ok(ticket)
    }

    /// Draw the outcome for the pending flip and settle it
    ///
    /// The ticket must belong to the flip currently pending; anything else
    /// is refused before drawing and leaves the session untouched.
    pub fn resolve_flip(
        &mut self,
        ticket: &FlipTicket,
        source: &dyn RandomnessSource,
    ) -> Result<Round> {
        let pending = self.pending.ok_or(SessionError::NoPendingFlip)?;
        if pending.ticket.flip_id != ticket.flip_id {
            return Err(SessionError::StaleFlip {
                expected: pending.ticket.flip_id,
                got: ticket.flip_id,
            });
        }

        let FlipTicket { stake, choice, .. } = pending.ticket;
        let outcome = CoinFace::from_draw(source.draw_boolean());
        let round = Round::settle(choice, stake, outcome);

        let balance = if round.win {
            self.balance
                .checked_add(stake.checked_mul(WIN_PAYOUT_MULTIPLIER)?)?
        } else {
            self.balance
        };

        self.balance = balance;
        self.last_result = Some(outcome);
        self.history.push_front(round.clone());
        self.history.truncate(HISTORY_LIMIT);
        self.message = if round.win {
            format!("You Win +{}!", stake)
        } else {
            format!("You Lose -{}.", stake)
        };
        self.pending = None;

        tracing::debug!(
            flip_id = %ticket.flip_id,
            spin_ms = (Utc::now() - pending.placed_at).num_milliseconds(),
            outcome = %outcome,
            win = round.win,
            balance = %self.balance,
            "Flip resolved"
        );
        Ok(round)
    }

    /// Restore the starting balance and clear history, keeping bet and choice
    ///
    /// A flip in flight is cancelled and returned; its ticket can no longer
    /// be resolved.
    pub fn reset(&mut self) -> Option<PendingFlip> {
        self.balance = Amount::STARTING_BALANCE;
        self.history.clear();
        self.message.clear();
        self.last_result = None;

        let cancelled = self.pending.take();
        if let Some(flip) = &cancelled {
            tracing::warn!(flip_id = %flip.ticket.flip_id, "Pending flip cancelled by reset");
        }
        cancelled
    }

    fn reject(&mut self, error: SessionError) -> SessionError {
        self.message = error.to_string();
        tracing::debug!(reason = error.reason(), "Flip rejected");
        error
    }
}
