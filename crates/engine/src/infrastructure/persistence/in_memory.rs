//! In-memory save storage for tests and throwaway sessions.

use async_trait::async_trait;
use branchline_domain::SaveGame;
use tokio::sync::RwLock;

use crate::infrastructure::ports::{RepoError, SaveRepo};

#[derive(Default)]
pub struct InMemorySaveRepo {
    slot: RwLock<Option<SaveGame>>,
    writes: RwLock<usize>,
}

impl InMemorySaveRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing save, as if loaded from disk.
    pub fn with_save(save: SaveGame) -> Self {
        Self {
            slot: RwLock::new(Some(save)),
            writes: RwLock::new(0),
        }
    }

    /// What a fresh process would load right now.
    pub async fn stored(&self) -> Option<SaveGame> {
        self.slot.read().await.clone()
    }

    pub async fn write_count(&self) -> usize {
        *self.writes.read().await
    }
}

#[async_trait]
impl SaveRepo for InMemorySaveRepo {
    async fn load(&self) -> Result<Option<SaveGame>, RepoError> {
        Ok(self.slot.read().await.clone())
    }

    async fn save(&self, save: &SaveGame) -> Result<(), RepoError> {
        *self.slot.write().await = Some(save.clone());
        *self.writes.write().await += 1;
        Ok(())
    }
}
