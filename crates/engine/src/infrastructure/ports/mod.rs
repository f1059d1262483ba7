//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Local save storage (could swap SQLite -> browser storage)
//! - Currency ledger, completion recorder, reward media (account services)
//! - Localization lookup
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::SaveRepo;

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{CompletionRecorderPort, CurrencyLedgerPort, RewardMediaPort, TextLookupPort};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::{
    MockCompletionRecorderPort, MockCurrencyLedgerPort, MockRewardMediaPort, MockTextLookupPort,
};
#[cfg(test)]
pub use repos::MockSaveRepo;
#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{LedgerError, RecorderError, RepoError, RewardError};
