//! Repository port traits for local persistence.

use async_trait::async_trait;
use branchline_domain::SaveGame;

use super::error::RepoError;

// =============================================================================
// Save Storage
// =============================================================================

/// Local key-value storage for the player's save game.
///
/// The whole save is written on every change; it is small (a handful of
/// scene ids and flags per scenario).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SaveRepo: Send + Sync {
    /// `None` when nothing was saved yet.
    async fn load(&self) -> Result<Option<SaveGame>, RepoError>;
    async fn save(&self, save: &SaveGame) -> Result<(), RepoError>;
}
