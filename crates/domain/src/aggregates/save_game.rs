//! Save game - everything the engine persists locally
//!
//! ```json
//! {
//!   "lang": "en",
//!   "scenarioStates": { "manor": { "scene": "s1", "flags": {}, "clues": [], "history": [] } },
//!   "profile": { "tutorialCurrencySeeded": false }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::aggregates::{PlayerProfile, ScenarioProgress};
use crate::ScenarioId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveGame {
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default)]
    pub scenario_states: BTreeMap<ScenarioId, ScenarioProgress>,
    #[serde(default)]
    pub profile: PlayerProfile,
}

fn default_lang() -> String {
    "en".to_string()
}

impl SaveGame {
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            scenario_states: BTreeMap::new(),
            profile: PlayerProfile::new(),
        }
    }

    pub fn progress(&self, scenario_id: &ScenarioId) -> Option<&ScenarioProgress> {
        self.scenario_states.get(scenario_id)
    }

    pub fn progress_mut(&mut self, scenario_id: &ScenarioId) -> Option<&mut ScenarioProgress> {
        self.scenario_states.get_mut(scenario_id)
    }
}

impl Default for SaveGame {
    fn default() -> Self {
        Self::new(default_lang())
    }
}
