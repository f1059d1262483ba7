//! Player profile - device-wide one-shot flags and completion bookkeeping
//!
//! These used to be loose boolean keys; grouping them here gives each a
//! clear lifecycle: they are only ever switched on, never back off.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{EndingKind, ScenarioId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    /// The tutorial has handed out its free unit of currency
    #[serde(default)]
    tutorial_currency_seeded: bool,
    /// The forced (non-dismissible) unlock prompt has been completed
    #[serde(default)]
    forced_unlock_completed: bool,
    /// Scenarios whose first-completion reward was credited
    #[serde(default)]
    first_completion_rewarded: BTreeSet<ScenarioId>,
    /// Endings reached, per scenario
    #[serde(default)]
    completed_endings: BTreeMap<ScenarioId, BTreeSet<EndingKind>>,
}

impl PlayerProfile {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn tutorial_currency_seeded(&self) -> bool {
        self.tutorial_currency_seeded
    }

    #[inline]
    pub fn forced_unlock_completed(&self) -> bool {
        self.forced_unlock_completed
    }

    pub fn first_completion_rewarded(&self, scenario_id: &ScenarioId) -> bool {
        self.first_completion_rewarded.contains(scenario_id)
    }

    pub fn completed_endings(&self, scenario_id: &ScenarioId) -> Vec<EndingKind> {
        self.completed_endings
            .get(scenario_id)
            .map(|endings| endings.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Returns `true` the first time only.
    pub fn mark_tutorial_currency_seeded(&mut self) -> bool {
        !std::mem::replace(&mut self.tutorial_currency_seeded, true)
    }

    /// Returns `true` the first time only.
    pub fn mark_forced_unlock_completed(&mut self) -> bool {
        !std::mem::replace(&mut self.forced_unlock_completed, true)
    }

    /// Returns `true` the first time only, per scenario.
    pub fn mark_first_completion_rewarded(&mut self, scenario_id: ScenarioId) -> bool {
        self.first_completion_rewarded.insert(scenario_id)
    }

    /// Returns `true` if this ending is new for the scenario.
    pub fn record_ending(&mut self, scenario_id: ScenarioId, ending: EndingKind) -> bool {
        self.completed_endings
            .entry(scenario_id)
            .or_default()
            .insert(ending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_flags_fire_once() {
        let mut profile = PlayerProfile::new();
        assert!(profile.mark_tutorial_currency_seeded());
        assert!(!profile.mark_tutorial_currency_seeded());
        assert!(profile.tutorial_currency_seeded());

        assert!(profile.mark_forced_unlock_completed());
        assert!(!profile.mark_forced_unlock_completed());
    }

    #[test]
    fn first_completion_is_tracked_per_scenario() {
        let mut profile = PlayerProfile::new();
        let manor = ScenarioId::from("manor");
        assert!(profile.mark_first_completion_rewarded(manor.clone()));
        assert!(!profile.mark_first_completion_rewarded(manor.clone()));
        assert!(profile.first_completion_rewarded(&manor));
        assert!(!profile.first_completion_rewarded(&ScenarioId::from("docks")));
    }

    #[test]
    fn endings_are_deduplicated() {
        let mut profile = PlayerProfile::new();
        let manor = ScenarioId::from("manor");
        assert!(profile.record_ending(manor.clone(), EndingKind::Bad));
        assert!(profile.record_ending(manor.clone(), EndingKind::Good));
        assert!(!profile.record_ending(manor.clone(), EndingKind::Bad));
        assert_eq!(
            profile.completed_endings(&manor),
            vec![EndingKind::Good, EndingKind::Bad]
        );
    }

    #[test]
    fn serializes_camel_case() {
        let mut profile = PlayerProfile::new();
        profile.mark_tutorial_currency_seeded();
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["tutorialCurrencySeeded"], true);
        assert_eq!(json["forcedUnlockCompleted"], false);
    }
}
