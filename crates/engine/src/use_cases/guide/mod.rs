//! Ending guide use cases.
//!
//! A guide is bought once and then covers re-targeting for as long as it
//! stays active. While active, the override makes every choice selectable
//! so the planned path can always be followed.

mod planner;

pub use planner::{compute_guide_plan, resolve_targets, PlanError};

use std::sync::Arc;

use branchline_domain::{CurrencyKind, EndingKind, GameEvent, GuidePlan, ScenarioId, Scene};

use crate::entities::{ProgressError, ProgressStore};
use crate::infrastructure::ports::{CurrencyLedgerPort, LedgerError};
use crate::stores::{GuideState, SessionStore};

#[derive(Debug, Clone)]
pub struct GuideSettings {
    pub cost: u32,
    pub currency: CurrencyKind,
}

#[derive(Debug, Clone)]
pub struct GuideActivation {
    pub plan: GuidePlan,
    /// False when an already active guide was re-targeted.
    pub charged: bool,
    pub events: Vec<GameEvent>,
}

/// Guide use case.
pub struct GuideUseCase {
    progress: Arc<ProgressStore>,
    session: Arc<SessionStore>,
    ledger: Arc<dyn CurrencyLedgerPort>,
    settings: GuideSettings,
}

impl GuideUseCase {
    pub fn new(
        progress: Arc<ProgressStore>,
        session: Arc<SessionStore>,
        ledger: Arc<dyn CurrencyLedgerPort>,
        settings: GuideSettings,
    ) -> Self {
        Self {
            progress,
            session,
            ledger,
            settings,
        }
    }

    /// Plan a route to `target` from the current scene and activate it.
    ///
    /// Plans before charging, so a missing route costs nothing. Standing on
    /// the target already counts as no route. A failed plan also drops any
    /// guide that was active.
    pub async fn activate(
        &self,
        scenario_id: &ScenarioId,
        target: EndingKind,
    ) -> Result<GuideActivation, GuideError> {
        let graph = self.progress.graph(scenario_id)?;
        let progress = self.progress.open(scenario_id).await?;
        if let Some(ending) = progress.ended() {
            tracing::info!(scenario_id = %scenario_id, ending = %ending, "Guide refused, run ended");
            return Err(GuideError::RunEnded { ending });
        }

        let plan = match compute_guide_plan(&graph, progress.scene(), target) {
            Ok(plan) if plan.edge_count() == 0 => {
                self.session.clear_guide().await;
                tracing::info!(
                    scenario_id = %scenario_id,
                    scene_id = %progress.scene(),
                    target = %target,
                    "Already at guide target"
                );
                return Err(GuideError::NoPlan { target });
            }
            Ok(plan) => plan,
            Err(e) => {
                self.session.clear_guide().await;
                return Err(match e {
                    PlanError::NoTargets { .. } | PlanError::Unreachable { .. } => {
                        tracing::info!(
                            scenario_id = %scenario_id,
                            scene_id = %progress.scene(),
                            target = %target,
                            reason = %e,
                            "No guide plan"
                        );
                        GuideError::NoPlan { target }
                    }
                    PlanError::BrokenPath { .. } => {
                        tracing::error!(
                            scenario_id = %scenario_id,
                            error = %e,
                            "Guide planning failed"
                        );
                        GuideError::Internal(e.to_string())
                    }
                });
            }
        };

        let already_active = self.session.is_guide_active().await;
        if !already_active {
            self.ledger
                .spend(&self.settings.currency, self.settings.cost)
                .await
                .map_err(|e| match e {
                    LedgerError::InsufficientFunds { kind, needed } => {
                        GuideError::InsufficientFunds { kind, needed }
                    }
                    other => GuideError::Ledger(other),
                })?;
        }

        self.session.activate_guide(scenario_id.clone(), &plan).await;
        tracing::info!(
            scenario_id = %scenario_id,
            target = %target,
            steps = plan.edge_count(),
            charged = !already_active,
            "Guide activated"
        );

        Ok(GuideActivation {
            plan,
            charged: !already_active,
            events: vec![GameEvent::GuideStateChanged {
                active: true,
                target: Some(target),
            }],
        })
    }

    /// Stop the guide. Returns the state change, if there was a guide.
    pub async fn stop(&self) -> Option<GameEvent> {
        if !self.session.clear_guide().await {
            return None;
        }
        tracing::info!("Guide stopped");
        Some(GameEvent::GuideStateChanged {
            active: false,
            target: None,
        })
    }

    pub async fn state(&self) -> GuideState {
        self.session.guide().await
    }

    /// Index of the choice the active guide takes from `scene`.
    pub async fn guided_choice(&self, scenario_id: &ScenarioId, scene: &Scene) -> Option<usize> {
        let guide = self.session.guide().await;
        guided_choice_index(&guide, scenario_id, scene)
    }
}

pub(crate) fn guided_choice_index(
    guide: &GuideState,
    scenario_id: &ScenarioId,
    scene: &Scene,
) -> Option<usize> {
    if !guide.active || guide.scenario_id.as_ref() != Some(scenario_id) {
        return None;
    }
    let next = guide.next_by_scene.get(scene.id())?;
    scene
        .choices()
        .iter()
        .position(|choice| choice.next() == Some(next))
}

#[derive(Debug, thiserror::Error)]
pub enum GuideError {
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error("Insufficient {kind}: {needed} needed")]
    InsufficientFunds { kind: CurrencyKind, needed: u32 },
    #[error("Ledger error: {0}")]
    Ledger(LedgerError),
    #[error("No route to a {target} ending from here")]
    NoPlan { target: EndingKind },
    #[error("The run reached the {ending} ending; restart to use the guide")]
    RunEnded { ending: EndingKind },
    #[error("Guide error: {0}")]
    Internal(String),
}
