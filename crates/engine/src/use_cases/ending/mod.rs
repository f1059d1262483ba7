//! Ending use case.
//!
//! Closes out a run that reached an ending: drops any guide, reports the
//! completion, pays the first-completion reward once per scenario and picks
//! the ending text and actions for presentation. Nothing here fails the
//! run; collaborator errors are logged.

use std::sync::Arc;

use branchline_domain::{CurrencyKind, EndingKind, GameEvent, ScenarioId, Scene, SceneId, TextKey};

use crate::entities::ProfileStore;
use crate::infrastructure::ports::{CompletionRecorderPort, CurrencyLedgerPort};
use crate::stores::SessionStore;

/// What the player can do from the ending screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndingAction {
    /// Hard reset and play again.
    Replay,
    /// Close the ending and leave the scenario. The run stays finished.
    Back,
    /// Close the ending and return to the scenario catalog.
    Home,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndingOutcome {
    pub scenario_id: ScenarioId,
    pub scene_id: SceneId,
    pub kind: EndingKind,
    pub title_key: TextKey,
    pub body_key: TextKey,
    /// First-completion reward credited by this ending.
    pub reward_granted: bool,
    /// First time this ending was reached in this scenario.
    pub newly_completed: bool,
    pub actions: Vec<EndingAction>,
}

#[derive(Debug, Clone)]
pub struct EndingSettings {
    pub currency: CurrencyKind,
    pub first_completion_reward: u32,
    pub tutorial_scenario: ScenarioId,
}

/// Handle ending use case.
pub struct HandleEnding {
    profile: Arc<ProfileStore>,
    session: Arc<SessionStore>,
    recorder: Arc<dyn CompletionRecorderPort>,
    ledger: Arc<dyn CurrencyLedgerPort>,
    settings: EndingSettings,
}

impl HandleEnding {
    pub fn new(
        profile: Arc<ProfileStore>,
        session: Arc<SessionStore>,
        recorder: Arc<dyn CompletionRecorderPort>,
        ledger: Arc<dyn CurrencyLedgerPort>,
        settings: EndingSettings,
    ) -> Self {
        Self {
            profile,
            session,
            recorder,
            ledger,
            settings,
        }
    }

    pub async fn execute(
        &self,
        scenario_id: &ScenarioId,
        scene: &Scene,
        kind: EndingKind,
    ) -> (EndingOutcome, Vec<GameEvent>) {
        let mut events = Vec::new();

        if self.session.clear_guide().await {
            tracing::info!(scenario_id = %scenario_id, "Guide ended with the run");
            events.push(GameEvent::GuideStateChanged {
                active: false,
                target: None,
            });
        }

        if let Err(e) = self.recorder.record_completion(scenario_id, kind).await {
            tracing::warn!(
                scenario_id = %scenario_id,
                ending = %kind,
                error = %e,
                "Failed to record completion"
            );
        }

        let newly_completed = self.profile.record_ending(scenario_id, kind).await;
        let reward_granted = self.grant_first_completion_reward(scenario_id).await;

        let title_key = scene
            .ending_title()
            .cloned()
            .unwrap_or_else(|| generic_key(kind, "title"));
        let body_key = scene
            .ending_body()
            .cloned()
            .unwrap_or_else(|| generic_key(kind, "body"));

        let actions = if scenario_id == &self.settings.tutorial_scenario {
            vec![EndingAction::Home]
        } else {
            vec![EndingAction::Replay, EndingAction::Back]
        };

        tracing::info!(
            scenario_id = %scenario_id,
            scene_id = %scene.id(),
            ending = %kind,
            newly_completed,
            reward_granted,
            "Ending reached"
        );
        events.push(GameEvent::EndingReached {
            scenario_id: scenario_id.clone(),
            scene_id: scene.id().clone(),
            ending: kind,
        });

        let outcome = EndingOutcome {
            scenario_id: scenario_id.clone(),
            scene_id: scene.id().clone(),
            kind,
            title_key,
            body_key,
            reward_granted,
            newly_completed,
            actions,
        };
        (outcome, events)
    }

    /// Credit first, mark second: a failed credit is retried on the next ending.
    async fn grant_first_completion_reward(&self, scenario_id: &ScenarioId) -> bool {
        let amount = self.settings.first_completion_reward;
        if amount == 0 || self.profile.first_completion_rewarded(scenario_id).await {
            return false;
        }

        match self.ledger.grant(&self.settings.currency, amount).await {
            Ok(()) => {
                self.profile.mark_first_completion_rewarded(scenario_id).await;
                tracing::info!(
                    scenario_id = %scenario_id,
                    currency = %self.settings.currency,
                    amount,
                    "First completion reward granted"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    scenario_id = %scenario_id,
                    error = %e,
                    "Failed to grant first completion reward"
                );
                false
            }
        }
    }
}

fn generic_key(kind: EndingKind, part: &str) -> TextKey {
    TextKey::new(format!("ending.{}.{}", kind, part))
}
