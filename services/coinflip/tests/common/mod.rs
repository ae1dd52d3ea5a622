/// Common test utilities and fixtures for integration tests
use std::sync::Arc;

use coinflip::{MemorySessionRepository, ScriptedRandomness, WagerService};
use shared::CoinFace;

/// A service over an in-memory store with scripted outcomes
pub struct TestContext {
    pub repo: MemorySessionRepository,
    pub randomness: Arc<ScriptedRandomness>,
    pub service: WagerService,
}

impl TestContext {
    /// Fresh store, every flip lands on `outcome`
    pub async fn new(outcome: CoinFace) -> Self {
        Self::with_outcomes(MemorySessionRepository::new(), [outcome]).await
    }

    /// Store seeded with a raw balance entry
    pub async fn with_balance(balance: &str, outcome: CoinFace) -> Self {
        let repo = MemorySessionRepository::new();
        repo.put_raw("cf-balance", balance).await;
        Self::with_outcomes(repo, [outcome]).await
    }

    pub async fn with_outcomes(
        repo: MemorySessionRepository,
        outcomes: impl IntoIterator<Item = CoinFace>,
    ) -> Self {
        let randomness = Arc::new(ScriptedRandomness::new(outcomes));
        let service = WagerService::open(Arc::new(repo.clone()), randomness.clone())
            .await
            .expect("Failed to open session");

        Self {
            repo,
            randomness,
            service,
        }
    }

    /// Place and immediately resolve one flip
    pub async fn play_round(&mut self) -> coinflip::Round {
        let ticket = self.service.place_flip().await.expect("Failed to place flip");
        self.service
            .resolve_flip(&ticket)
            .await
            .expect("Failed to resolve flip")
    }

    /// Reopen a service over the same store, as a page reload would
    pub async fn reload(&self) -> WagerService {
        WagerService::open(Arc::new(self.repo.clone()), self.randomness.clone())
            .await
            .expect("Failed to reopen session")
    }
}
