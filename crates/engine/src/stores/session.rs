//! Per-session play state.
//!
//! Holds what used to be process-wide: the scenario being played, the
//! active guide and the override flag. Nothing here is persisted.

use std::collections::HashMap;

use branchline_domain::{EndingKind, GuidePlan, ScenarioId, SceneId};
use tokio::sync::RwLock;

/// Active guide, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuideState {
    pub active: bool,
    pub scenario_id: Option<ScenarioId>,
    pub target: Option<EndingKind>,
    /// Scene id -> the scene the plan moves to from there.
    pub next_by_scene: HashMap<SceneId, SceneId>,
    pub path: Vec<SceneId>,
}

#[derive(Debug, Default)]
struct SessionState {
    current_scenario: Option<ScenarioId>,
    guide: GuideState,
    // Only ever true while `guide.active` is true.
    override_active: bool,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    inner: RwLock<SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn current_scenario(&self) -> Option<ScenarioId> {
        self.inner.read().await.current_scenario.clone()
    }

    pub async fn set_current_scenario(&self, scenario_id: ScenarioId) {
        self.inner.write().await.current_scenario = Some(scenario_id);
    }

    pub async fn guide(&self) -> GuideState {
        self.inner.read().await.guide.clone()
    }

    pub async fn is_guide_active(&self) -> bool {
        self.inner.read().await.guide.active
    }

    pub async fn is_override_active(&self) -> bool {
        self.inner.read().await.override_active
    }

    /// Install a plan and turn the override on.
    pub async fn activate_guide(&self, scenario_id: ScenarioId, plan: &GuidePlan) {
        let mut state = self.inner.write().await;
        state.guide = GuideState {
            active: true,
            scenario_id: Some(scenario_id),
            target: Some(plan.target()),
            next_by_scene: plan.next_by_scene(),
            path: plan.path().to_vec(),
        };
        state.override_active = true;
    }

    /// Drop the guide and the override. Returns `true` if a guide was active.
    pub async fn clear_guide(&self) -> bool {
        let mut state = self.inner.write().await;
        let was_active = state.guide.active;
        state.guide = GuideState::default();
        state.override_active = false;
        was_active
    }
}
