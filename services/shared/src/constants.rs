/// Shared constants for the coin flip wager game
///
/// This module centralizes the magic numbers of the game so the session,
/// the persistence layer and every host agree on them.

/// Number of cents in one point
pub const CENTS_PER_POINT: u64 = 100;

/// Balance granted to a fresh session and restored by a reset (10 points)
pub const STARTING_BALANCE_CENTS: u64 = 10 * CENTS_PER_POINT;

/// Selectable stakes in cents (0.1, 0.5 and 1 point)
pub const BET_OPTIONS_CENTS: [u64; 3] = [10, 50, 100];

/// Maximum number of rounds kept in history, in memory and in storage
///
/// Oldest rounds are evicted first.
pub const HISTORY_LIMIT: usize = 50;

/// Multiplier applied to the stake when a flip is won
///
/// The stake is deducted up front, so a win nets exactly one stake.
pub const WIN_PAYOUT_MULTIPLIER: u64 = 2;

/// Storage key holding the balance as a decimal string
pub const BALANCE_STORAGE_KEY: &str = "cf-balance";

/// Storage key holding the history as a JSON array
pub const HISTORY_STORAGE_KEY: &str = "cf-history";

/// Delay hosts wait between placing and resolving a flip (coin animation)
pub const DEFAULT_FLIP_DELAY_MS: u64 = 1_600;

/// Message shown when a flip is attempted while another one is in flight
pub const MSG_FLIP_IN_PROGRESS: &str = "Flipping... please wait for completion.";

/// Message shown when the balance cannot cover the selected stake
pub const MSG_INSUFFICIENT_BALANCE: &str = "Insufficient balance.";
