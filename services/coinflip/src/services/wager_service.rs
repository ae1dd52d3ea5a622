//! Persisting facade over the wager session
//!
//! Hosts talk to this service rather than to [`WagerSession`] directly: it
//! saves balance and history after every mutation, records metrics and
//! wires in the randomness source. A failed save is logged and counted but
//! never undoes or hides a mutation the session already made, so a placed
//! flip always hands back its ticket.

use shared::{BetOption, CoinFace};
use std::sync::Arc;

use crate::domain::{FlipTicket, PendingFlip, Round, SessionView};
use crate::errors::Result;
use crate::randomness::RandomnessSource;
use crate::repository::SessionRepository;
use crate::session::WagerSession;

pub struct WagerService {
    session: WagerSession,
    repository: Arc<dyn SessionRepository>,
    randomness: Arc<dyn RandomnessSource>,
}

impl WagerService {
    /// Load the stored session (or defaults) and wrap it
    pub async fn open(
        repository: Arc<dyn SessionRepository>,
        randomness: Arc<dyn RandomnessSource>,
    ) -> Result<Self> {
        let persisted = repository.load().await?;
        let session = WagerSession::from_persisted(persisted);

        tracing::info!(
            balance = %session.balance(),
            history_len = session.history().len(),
            "Session loaded"
        );

        Ok(Self {
            session,
            repository,
            randomness,
        })
    }

    pub fn session(&self) -> &WagerSession {
        &self.session
    }

    pub fn view(&self) -> SessionView {
        self.session.view()
    }

    pub fn select_bet(&mut self, bet: BetOption) {
        self.session.select_bet(bet);
        tracing::debug!(bet = %bet, "Bet selected");
    }

    pub fn select_choice(&mut self, face: CoinFace) {
        self.session.select_choice(face);
        tracing::debug!(choice = %face, "Choice selected");
    }

    #[tracing::instrument(skip(self), fields(bet = %self.session.selected_bet()))]
    pub async fn place_flip(&mut self) -> Result<FlipTicket> {
        let ticket = match self.session.place_flip() {
            Ok(ticket) => ticket,
            Err(e) => {
                if e.is_rejection() {
                    metrics::counter!("flips_rejected_total", "reason" => e.reason()).increment(1);
                }
                return Err(e);
            }
        };

        self.persist().await;

        tracing::info!(
            flip_id = %ticket.flip_id,
            stake = %ticket.stake,
            choice = %ticket.choice,
            "Flip placed"
        );
        metrics::counter!("flips_placed_total").increment(1);
        Ok(ticket)
    }

    #[tracing::instrument(skip(self, ticket), fields(flip_id = %ticket.flip_id))]
    pub async fn resolve_flip(&mut self, ticket: &FlipTicket) -> Result<Round> {
        let round = self.session.resolve_flip(ticket, self.randomness.as_ref())?;

        self.persist().await;

        tracing::info!(
            outcome = %round.outcome,
            win = round.win,
            balance = %self.session.balance(),
            "Flip resolved"
        );
        let result = if round.win { "win" } else { "loss" };
        metrics::counter!("flips_resolved_total", "result" => result).increment(1);
        Ok(round)
    }

    #[tracing::instrument(skip(self))]
    pub async fn reset(&mut self) -> Option<PendingFlip> {
        let cancelled = self.session.reset();

        self.persist().await;

        tracing::info!(cancelled_flip = cancelled.is_some(), "Session reset");
        metrics::counter!("session_resets_total").increment(1);
        cancelled
    }

    async fn persist(&self) {
        let persisted = self.session.persisted();
        if let Err(e) = self
            .repository
            .save(persisted.balance, &persisted.history)
            .await
        {
            tracing::error!(error = %e, "Failed to persist session");
            metrics::counter!("session_save_failures_total").increment(1);
        }
    }
}
