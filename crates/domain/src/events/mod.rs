//! Domain Events
//!
//! Coarse-grained events describing what changed during play. Use cases
//! return them so the presentation layer can react (redraw the scene,
//! open the unlock dialog, show the ending screen) without polling state.

use serde::{Deserialize, Serialize};

use crate::value_objects::MissingRequirements;
use crate::{EndingKind, FlagId, ScenarioId, SceneId};

/// How flags were handed to the player outside normal play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GrantSource {
    CurrencySpend,
    RewardMedia,
}

/// Game event for significant state changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameEvent {
    SceneChanged {
        scenario_id: ScenarioId,
        from: SceneId,
        to: SceneId,
    },
    ChoiceLocked {
        scenario_id: ScenarioId,
        scene_id: SceneId,
        choice_index: usize,
        missing: MissingRequirements,
    },
    FlagsGranted {
        scenario_id: ScenarioId,
        flags: Vec<FlagId>,
        source: GrantSource,
    },
    GuideStateChanged {
        active: bool,
        target: Option<EndingKind>,
    },
    EndingReached {
        scenario_id: ScenarioId,
        scene_id: SceneId,
        ending: EndingKind,
    },
    ProgressReset {
        scenario_id: ScenarioId,
    },
}

impl GameEvent {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::SceneChanged { .. } => "scene_changed",
            GameEvent::ChoiceLocked { .. } => "choice_locked",
            GameEvent::FlagsGranted { .. } => "flags_granted",
            GameEvent::GuideStateChanged { .. } => "guide_state_changed",
            GameEvent::EndingReached { .. } => "ending_reached",
            GameEvent::ProgressReset { .. } => "progress_reset",
        }
    }
}
