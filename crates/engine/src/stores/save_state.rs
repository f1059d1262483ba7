//! Save game state with write-through persistence.
//!
//! The in-memory copy is authoritative for the session. Every update is
//! written to the `SaveRepo` before the lock is released, so a reader never
//! sees state that is not yet on disk. A failed write is logged and play
//! continues from memory.

use std::sync::Arc;

use branchline_domain::SaveGame;
use tokio::sync::RwLock;

use crate::infrastructure::ports::SaveRepo;

pub struct SaveStateStore {
    state: RwLock<SaveGame>,
    repo: Arc<dyn SaveRepo>,
}

impl SaveStateStore {
    pub fn new(repo: Arc<dyn SaveRepo>, default_lang: &str) -> Self {
        Self {
            state: RwLock::new(SaveGame::new(default_lang)),
            repo,
        }
    }

    /// Replace the in-memory save with the stored one, if any.
    pub async fn load(&self) {
        match self.repo.load().await {
            Ok(Some(save)) => {
                tracing::info!(
                    scenarios = save.scenario_states.len(),
                    lang = %save.lang,
                    "Loaded save game"
                );
                *self.state.write().await = save;
            }
            Ok(None) => tracing::debug!("No save game stored yet"),
            Err(e) => tracing::warn!(error = %e, "Failed to load save game, starting fresh"),
        }
    }

    pub async fn read<R>(&self, f: impl FnOnce(&SaveGame) -> R) -> R {
        let guard = self.state.read().await;
        f(&*guard)
    }

    /// Mutate the save and persist it.
    pub async fn update<R>(&self, f: impl FnOnce(&mut SaveGame) -> R) -> R {
        let mut guard = self.state.write().await;
        let result = f(&mut *guard);
        if let Err(e) = self.repo.save(&guard).await {
            tracing::warn!(error = %e, "Failed to persist save game, continuing in memory");
        }
        result
    }

    pub async fn lang(&self) -> String {
        self.read(|save| save.lang.clone()).await
    }

    pub async fn snapshot(&self) -> SaveGame {
        self.read(SaveGame::clone).await
    }
}
