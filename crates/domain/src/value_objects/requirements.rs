//! Flag requirements gating a choice.
//!
//! A choice may require every flag of one group (`requires_all_flags`) and
//! at least one flag of another (`requires_any_flags`). The two groups are
//! evaluated independently and combined with AND. An empty group never
//! blocks.

use serde::{Deserialize, Serialize};

use crate::aggregates::ScenarioProgress;
use crate::FlagId;

/// The gating rules of a single choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagRequirements {
    all: Vec<FlagId>,
    any: Vec<FlagId>,
}

impl FlagRequirements {
    pub fn new(all: Vec<FlagId>, any: Vec<FlagId>) -> Self {
        Self { all, any }
    }

    /// Flags that must all be set.
    pub fn all(&self) -> &[FlagId] {
        &self.all
    }

    /// Flags of which at least one must be set.
    pub fn any(&self) -> &[FlagId] {
        &self.any
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty() && self.any.is_empty()
    }

    /// Whether the progress satisfies both groups.
    pub fn is_satisfied_by(&self, progress: &ScenarioProgress) -> bool {
        let all_met = self.all.iter().all(|flag| progress.has_flag(flag));
        let any_met = self.any.is_empty() || self.any.iter().any(|flag| progress.has_flag(flag));
        all_met && any_met
    }

    /// The gap between these requirements and the progress' flags.
    ///
    /// `missing_any` holds the whole `any` group when none of it is set,
    /// since any single member would unlock the choice.
    pub fn missing(&self, progress: &ScenarioProgress) -> MissingRequirements {
        let missing_all = self
            .all
            .iter()
            .filter(|flag| !progress.has_flag(flag))
            .cloned()
            .collect();

        let any_met = self.any.is_empty() || self.any.iter().any(|flag| progress.has_flag(flag));
        let missing_any = if any_met { Vec::new() } else { self.any.clone() };

        MissingRequirements {
            missing_all,
            missing_any,
        }
    }
}

/// What a player lacks to select a locked choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingRequirements {
    pub missing_all: Vec<FlagId>,
    pub missing_any: Vec<FlagId>,
}

impl MissingRequirements {
    pub fn is_empty(&self) -> bool {
        self.missing_all.is_empty() && self.missing_any.is_empty()
    }

    /// Flags an unlock grants to close this gap.
    ///
    /// Every missing `all` flag is granted. Otherwise only the first flag of
    /// the `any` group is granted, one being enough.
    pub fn flags_to_grant(&self) -> Vec<FlagId> {
        if !self.missing_all.is_empty() {
            return self.missing_all.clone();
        }
        self.missing_any.first().cloned().into_iter().collect()
    }
}
