/// Integration tests for the full place/resolve/persist cycle
mod common;

use common::TestContext;
use coinflip::{MemorySessionRepository, SessionError, SessionRepository};
use shared::{Amount, BetOption, CoinFace, HISTORY_LIMIT};
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn test_winning_round_scenario() {
    let mut ctx = TestContext::new(CoinFace::Heads).await;
    ctx.service.select_bet(BetOption::Whole);
    ctx.service.select_choice(CoinFace::Heads);

    let ticket = assert_ok!(ctx.service.place_flip().await);
    assert_eq!(ctx.service.view().balance.to_string(), "9");
    assert!(ctx.service.view().pending);

    assert_ok!(ctx.service.resolve_flip(&ticket).await);

    let view = ctx.service.view();
    assert_eq!(view.balance.to_string(), "11");
    assert!(!view.pending);
    assert_eq!(view.last_result, Some(CoinFace::Heads));
    assert_eq!(view.history[0].bet, Amount::from_cents(100));
    assert_eq!(view.history[0].outcome, CoinFace::Heads);
    assert!(view.history[0].win);
    assert_eq!(view.message, "You Win +1!");
}

#[tokio::test]
async fn test_insufficient_balance_scenario() {
    let mut ctx = TestContext::with_balance("0.1", CoinFace::Heads).await;
    ctx.service.select_bet(BetOption::Half);

    let err = assert_err!(ctx.service.place_flip().await);

    assert!(matches!(err, SessionError::InsufficientBalance));
    let view = ctx.service.view();
    assert_eq!(view.balance.to_string(), "0.1");
    assert!(!view.pending);
    assert!(view.history.is_empty());
    assert_eq!(view.message, "Insufficient balance.");
    assert_eq!(ctx.randomness.draws(), 0);
}

#[tokio::test]
async fn test_flip_in_progress_scenario() {
    let mut ctx = TestContext::new(CoinFace::Tails).await;
    let ticket = assert_ok!(ctx.service.place_flip().await);
    let before = ctx.service.view();

    let err = assert_err!(ctx.service.place_flip().await);

    assert!(matches!(err, SessionError::FlipInProgress));
    let after = ctx.service.view();
    assert_eq!(after.balance, before.balance);
    assert_eq!(after.history, before.history);
    assert!(after.pending);
    assert_eq!(after.message, "Flipping... please wait for completion.");

    assert_ok!(ctx.service.resolve_flip(&ticket).await);
    assert_eq!(ctx.service.view().balance.to_string(), "9.9");
}

#[tokio::test]
async fn test_every_bet_option_settles_exactly() {
    for bet in BetOption::ALL {
        for outcome in [CoinFace::Heads, CoinFace::Tails] {
            let mut ctx = TestContext::new(outcome).await;
            ctx.service.select_bet(bet);
            ctx.service.select_choice(CoinFace::Heads);

            let round = ctx.play_round().await;

            let expected = if round.win {
                Amount::STARTING_BALANCE.checked_add(bet.amount()).unwrap()
            } else {
                Amount::STARTING_BALANCE.checked_sub(bet.amount()).unwrap()
            };
            assert_eq!(ctx.service.view().balance, expected);
            assert_eq!(round.win, outcome == CoinFace::Heads);
        }
    }
}

#[tokio::test]
async fn test_history_never_exceeds_limit() {
    let repo = MemorySessionRepository::new();
    repo.put_raw("cf-balance", "1000").await;
    let mut ctx = TestContext::with_outcomes(repo, [CoinFace::Heads, CoinFace::Tails]).await;

    for _ in 0..(HISTORY_LIMIT + 20) {
        ctx.play_round().await;
        assert!(ctx.service.view().history_len <= HISTORY_LIMIT);
    }

    assert_eq!(ctx.service.view().history_len, HISTORY_LIMIT);
    let stored = assert_ok!(ctx.repo.load().await);
    assert_eq!(stored.history.len(), HISTORY_LIMIT);
    assert_eq!(stored.history, ctx.service.view().history);
}

#[tokio::test]
async fn test_oldest_round_is_evicted_first() {
    let repo = MemorySessionRepository::new();
    repo.put_raw("cf-balance", "1000").await;
    let mut ctx = TestContext::with_outcomes(repo, [CoinFace::Tails]).await;

    ctx.service.select_bet(BetOption::Half);
    ctx.play_round().await;
    ctx.service.select_bet(BetOption::Tenth);
    for _ in 0..(HISTORY_LIMIT - 1) {
        ctx.play_round().await;
    }

    let stored = assert_ok!(ctx.repo.load().await);
    assert_eq!(stored.history.len(), HISTORY_LIMIT);
    assert_eq!(stored.history[HISTORY_LIMIT - 1].bet, BetOption::Half.amount());

    ctx.service.select_bet(BetOption::Whole);
    let newest = ctx.play_round().await;

    let stored = assert_ok!(ctx.repo.load().await);
    assert_eq!(stored.history.len(), HISTORY_LIMIT);
    assert_eq!(stored.history[0], newest);
    assert_eq!(stored.history[0].bet, BetOption::Whole.amount());
    assert!(stored
        .history
        .iter()
        .all(|round| round.bet != BetOption::Half.amount()));
}

#[tokio::test]
async fn test_alternating_outcomes_do_not_drift() {
    let mut ctx = TestContext::with_outcomes(
        MemorySessionRepository::new(),
        [CoinFace::Heads, CoinFace::Tails],
    )
    .await;
    ctx.service.select_bet(BetOption::Tenth);

    for _ in 0..200 {
        ctx.play_round().await;
    }

    // 100 wins and 100 losses of 0.1 cancel out exactly
    assert_eq!(ctx.service.view().balance, Amount::STARTING_BALANCE);
}

#[tokio::test]
async fn test_reload_restores_balance_and_history() {
    let mut ctx = TestContext::with_outcomes(
        MemorySessionRepository::new(),
        [CoinFace::Tails, CoinFace::Heads, CoinFace::Heads],
    )
    .await;
    ctx.service.select_bet(BetOption::Half);
    for _ in 0..3 {
        ctx.play_round().await;
    }
    let before = ctx.service.view();

    let reloaded = ctx.reload().await;
    let after = reloaded.view();

    assert_eq!(after.balance, before.balance);
    assert_eq!(after.balance.to_string(), "10.5");
    assert_eq!(after.history, before.history);
    // Selection and message are not persisted
    assert_eq!(after.selected_bet, BetOption::Tenth.amount());
    assert!(after.message.is_empty());
}

#[tokio::test]
async fn test_reset_after_many_rounds() {
    let mut ctx = TestContext::new(CoinFace::Tails).await;
    ctx.service.select_bet(BetOption::Whole);
    ctx.service.select_choice(CoinFace::Tails);
    for _ in 0..4 {
        ctx.play_round().await;
    }
    assert_eq!(ctx.service.view().balance.to_string(), "14");

    ctx.service.reset().await;

    let view = ctx.service.view();
    assert_eq!(view.balance, Amount::STARTING_BALANCE);
    assert!(view.history.is_empty());
    assert_eq!(view.last_result, None);
    assert_eq!(view.selected_bet, BetOption::Whole.amount());
    assert_eq!(view.choice, CoinFace::Tails);

    let reloaded = ctx.reload().await.view();
    assert_eq!(reloaded.balance, Amount::STARTING_BALANCE);
    assert!(reloaded.history.is_empty());
}

#[tokio::test]
async fn test_stray_resolve_after_reset_is_refused() {
    let mut ctx = TestContext::new(CoinFace::Heads).await;
    ctx.service.select_bet(BetOption::Whole);
    let ticket = assert_ok!(ctx.service.place_flip().await);

    let cancelled = ctx.service.reset().await;
    assert_eq!(cancelled.map(|flip| flip.ticket), Some(ticket));

    let err = assert_err!(ctx.service.resolve_flip(&ticket).await);
    assert!(matches!(err, SessionError::NoPendingFlip));
    assert_eq!(ctx.service.view().balance, Amount::STARTING_BALANCE);
    assert!(ctx.service.view().history.is_empty());
    assert_eq!(ctx.randomness.draws(), 0);
}

#[tokio::test]
async fn test_malformed_store_falls_back_to_defaults() {
    let repo = MemorySessionRepository::new();
    repo.put_raw("cf-balance", "not-a-number").await;
    repo.put_raw("cf-history", "[{\"broken\": true}").await;

    let ctx = TestContext::with_outcomes(repo, [CoinFace::Heads]).await;

    let view = ctx.service.view();
    assert_eq!(view.balance, Amount::STARTING_BALANCE);
    assert!(view.history.is_empty());
}
