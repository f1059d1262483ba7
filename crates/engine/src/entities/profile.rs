//! Player profile entity.
//!
//! One-shot device flags and completion bookkeeping, stored in the save.

use std::sync::Arc;

use branchline_domain::{EndingKind, PlayerProfile, ScenarioId};

use crate::stores::SaveStateStore;

pub struct ProfileStore {
    save: Arc<SaveStateStore>,
}

impl ProfileStore {
    pub fn new(save: Arc<SaveStateStore>) -> Self {
        Self { save }
    }

    pub async fn get(&self) -> PlayerProfile {
        self.save.read(|save| save.profile.clone()).await
    }

    pub async fn tutorial_currency_seeded(&self) -> bool {
        self.save
            .read(|save| save.profile.tutorial_currency_seeded())
            .await
    }

    pub async fn forced_unlock_completed(&self) -> bool {
        self.save
            .read(|save| save.profile.forced_unlock_completed())
            .await
    }

    pub async fn first_completion_rewarded(&self, scenario_id: &ScenarioId) -> bool {
        self.save
            .read(|save| save.profile.first_completion_rewarded(scenario_id))
            .await
    }

    /// Returns `true` the first time only.
    pub async fn mark_tutorial_currency_seeded(&self) -> bool {
        self.save
            .update(|save| save.profile.mark_tutorial_currency_seeded())
            .await
    }

    /// Returns `true` the first time only.
    pub async fn mark_forced_unlock_completed(&self) -> bool {
        self.save
            .update(|save| save.profile.mark_forced_unlock_completed())
            .await
    }

    /// Returns `true` the first time only.
    pub async fn mark_first_completion_rewarded(&self, scenario_id: &ScenarioId) -> bool {
        let scenario_id = scenario_id.clone();
        self.save
            .update(move |save| save.profile.mark_first_completion_rewarded(scenario_id))
            .await
    }

    /// Returns `true` if this ending is new for the scenario.
    pub async fn record_ending(&self, scenario_id: &ScenarioId, ending: EndingKind) -> bool {
        let scenario_id = scenario_id.clone();
        self.save
            .update(move |save| save.profile.record_ending(scenario_id, ending))
            .await
    }

    pub async fn completed_endings(&self, scenario_id: &ScenarioId) -> Vec<EndingKind> {
        self.save
            .read(|save| save.profile.completed_endings(scenario_id))
            .await
    }
}
