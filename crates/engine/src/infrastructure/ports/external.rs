//! External service ports.
//!
//! Account storage, ads and localization live outside the engine. The
//! engine only sees these capabilities.

use async_trait::async_trait;
use branchline_domain::{CurrencyKind, EndingKind, ScenarioId};

use super::error::{LedgerError, RecorderError, RewardError};

// =============================================================================
// Currency Ledger
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CurrencyLedgerPort: Send + Sync {
    /// Debit `amount`; fails with `InsufficientFunds` without debiting.
    async fn spend(&self, kind: &CurrencyKind, amount: u32) -> Result<(), LedgerError>;

    /// Credit `amount`.
    async fn grant(&self, kind: &CurrencyKind, amount: u32) -> Result<(), LedgerError>;

    async fn balance(&self, kind: &CurrencyKind) -> Result<u32, LedgerError>;
}

// =============================================================================
// Completion Recorder
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionRecorderPort: Send + Sync {
    async fn record_completion(
        &self,
        scenario_id: &ScenarioId,
        ending: EndingKind,
    ) -> Result<(), RecorderError>;
}

// =============================================================================
// Reward Media
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RewardMediaPort: Send + Sync {
    /// Resolves once the player has finished the reward media.
    async fn request_reward(&self) -> Result<(), RewardError>;
}

// =============================================================================
// Localization
// =============================================================================

/// Key to display-string lookup for the current language.
#[cfg_attr(test, mockall::automock)]
pub trait TextLookupPort: Send + Sync {
    fn lookup(&self, lang: &str, key: &str) -> Option<String>;
}
