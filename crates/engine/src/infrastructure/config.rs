//! Engine configuration read from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `BRANCHLINE_SAVE_DB` | `branchline.db` |
//! | `BRANCHLINE_UNLOCK_COST` | `1` |
//! | `BRANCHLINE_GUIDE_COST` | `3` |
//! | `BRANCHLINE_CURRENCY` | `jetons` |
//! | `BRANCHLINE_FIRST_COMPLETION_REWARD` | `1` |
//! | `BRANCHLINE_TUTORIAL_SCENARIO` | `tutorial` |
//! | `BRANCHLINE_DEFAULT_LANG` | `en` |
//! | `BRANCHLINE_STARTING_BALANCE` | `0` |

use branchline_domain::{CurrencyKind, ScenarioId};

const DEFAULT_SAVE_DB: &str = "branchline.db";
const DEFAULT_UNLOCK_COST: u32 = 1;
const DEFAULT_GUIDE_COST: u32 = 3;
const DEFAULT_CURRENCY: &str = "jetons";
const DEFAULT_FIRST_COMPLETION_REWARD: u32 = 1;
const DEFAULT_TUTORIAL_SCENARIO: &str = "tutorial";
const DEFAULT_LANG: &str = "en";
const DEFAULT_STARTING_BALANCE: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// SQLite file holding the save game.
    pub save_db_path: String,
    /// Price of a single monetized unlock.
    pub unlock_cost: u32,
    /// Price of the first guide activation.
    pub guide_cost: u32,
    /// Premium currency charged for unlocks and guides.
    pub currency: CurrencyKind,
    /// Credited once per scenario on its first ending.
    pub first_completion_reward: u32,
    /// Scenario that forces the unlock tutorial and hides "replay".
    pub tutorial_scenario: ScenarioId,
    pub default_lang: String,
    /// Opening balance of the local ledger used by the text runner.
    pub starting_balance: u32,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let text = |key: &str, default: &str| -> String {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let amount = |key: &str, default: u32| -> u32 {
            match lookup(key) {
                Some(raw) => match raw.trim().parse::<u32>() {
                    Ok(value) => value,
                    Err(e) => {
                        tracing::warn!(
                            key = key,
                            value = %raw,
                            error = %e,
                            default = default,
                            "Invalid amount in configuration, using default"
                        );
                        default
                    }
                },
                None => default,
            }
        };

        Self {
            save_db_path: text("BRANCHLINE_SAVE_DB", DEFAULT_SAVE_DB),
            unlock_cost: amount("BRANCHLINE_UNLOCK_COST", DEFAULT_UNLOCK_COST),
            guide_cost: amount("BRANCHLINE_GUIDE_COST", DEFAULT_GUIDE_COST),
            currency: CurrencyKind::new(text("BRANCHLINE_CURRENCY", DEFAULT_CURRENCY)),
            first_completion_reward: amount(
                "BRANCHLINE_FIRST_COMPLETION_REWARD",
                DEFAULT_FIRST_COMPLETION_REWARD,
            ),
            tutorial_scenario: ScenarioId::new(text(
                "BRANCHLINE_TUTORIAL_SCENARIO",
                DEFAULT_TUTORIAL_SCENARIO,
            )),
            default_lang: text("BRANCHLINE_DEFAULT_LANG", DEFAULT_LANG),
            starting_balance: amount("BRANCHLINE_STARTING_BALANCE", DEFAULT_STARTING_BALANCE),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
