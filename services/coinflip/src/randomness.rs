//! Randomness sources for flip outcomes
//!
//! The session only needs one fair boolean per flip. Production hosts use
//! [`SecureRandomness`]; tests and demos drive outcomes with
//! [`ScriptedRandomness`].

use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use shared::CoinFace;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Supplies one unbiased boolean per call (true = heads)
pub trait RandomnessSource: Send + Sync {
    fn draw_boolean(&self) -> bool;
}

/// OS-backed cryptographically secure draw with a PRNG fallback
#[derive(Debug, Default, Clone, Copy)]
pub struct SecureRandomness;

impl SecureRandomness {
    pub fn new() -> Self {
        Self
    }

    fn try_secure_draw() -> Result<bool, rand::Error> {
        let mut word = [0u8; 4];
        OsRng.try_fill_bytes(&mut word)?;
        Ok(u32::from_le_bytes(word) & 1 == 1)
    }
}

impl RandomnessSource for SecureRandomness {
    fn draw_boolean(&self) -> bool {
        match Self::try_secure_draw() {
            Ok(draw) => draw,
            Err(e) => {
                tracing::warn!(error = %e, "OS randomness unavailable, falling back to thread RNG");
                rand::thread_rng().gen_bool(0.5)
            }
        }
    }
}

/// Replays a fixed sequence of outcomes, cycling when exhausted
#[derive(Debug)]
pub struct ScriptedRandomness {
    outcomes: Vec<CoinFace>,
    cursor: AtomicUsize,
}

impl ScriptedRandomness {
    /// An empty script behaves like `always(CoinFace::Heads)`
    pub fn new(outcomes: impl IntoIterator<Item = CoinFace>) -> Self {
        let mut outcomes: Vec<CoinFace> = outcomes.into_iter().collect();
        if outcomes.is_empty() {
            outcomes.push(CoinFace::Heads);
        }
        Self {
            outcomes,
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn always(face: CoinFace) -> Self {
        Self::new([face])
    }

    /// Number of draws taken so far
    pub fn draws(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

impl RandomnessSource for ScriptedRandomness {
    fn draw_boolean(&self) -> bool {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst) % self.outcomes.len();
        self.outcomes[index] == CoinFace::Heads
    }
}
