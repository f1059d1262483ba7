//! Enter and restart a scenario.

use std::sync::Arc;

use branchline_domain::{GameEvent, ScenarioId, ScenarioProgress};

use super::SessionError;
use crate::entities::ProgressStore;
use crate::stores::SessionStore;

#[derive(Debug, Clone)]
pub struct EnterResult {
    pub progress: ScenarioProgress,
    /// The player has progress worth resuming; ask before restarting.
    pub resumable: bool,
    pub events: Vec<GameEvent>,
}

/// Make a scenario the current one and open its progress.
pub struct EnterScenario {
    progress: Arc<ProgressStore>,
    session: Arc<SessionStore>,
}

impl EnterScenario {
    pub fn new(progress: Arc<ProgressStore>, session: Arc<SessionStore>) -> Self {
        Self { progress, session }
    }

    pub async fn execute(&self, scenario_id: &ScenarioId) -> Result<EnterResult, SessionError> {
        // Checked after opening, so a repaired pointer counts as the start.
        let progress = self.progress.open(scenario_id).await?;
        let resumable = self.progress.has_meaningful_progress(scenario_id).await?;

        let mut events = Vec::new();
        let guide = self.session.guide().await;
        if guide.active && guide.scenario_id.as_ref() != Some(scenario_id) {
            self.session.clear_guide().await;
            tracing::info!(scenario_id = %scenario_id, "Guide dropped on scenario switch");
            events.push(GameEvent::GuideStateChanged {
                active: false,
                target: None,
            });
        }
        self.session.set_current_scenario(scenario_id.clone()).await;

        tracing::info!(
            scenario_id = %scenario_id,
            scene_id = %progress.scene(),
            resumable,
            "Entered scenario"
        );
        Ok(EnterResult {
            progress,
            resumable,
            events,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RestartResult {
    pub progress: ScenarioProgress,
    pub events: Vec<GameEvent>,
}

/// Hard reset: back to the start scene with nothing carried over.
pub struct RestartScenario {
    progress: Arc<ProgressStore>,
    session: Arc<SessionStore>,
}

impl RestartScenario {
    pub fn new(progress: Arc<ProgressStore>, session: Arc<SessionStore>) -> Self {
        Self { progress, session }
    }

    pub async fn execute(&self, scenario_id: &ScenarioId) -> Result<RestartResult, SessionError> {
        let progress = self.progress.hard_reset(scenario_id).await?;

        let mut events = Vec::new();
        if self.session.clear_guide().await {
            events.push(GameEvent::GuideStateChanged {
                active: false,
                target: None,
            });
        }
        events.push(GameEvent::ProgressReset {
            scenario_id: scenario_id.clone(),
        });

        Ok(RestartResult { progress, events })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::e2e_tests::e2e_helpers::{TestHarness, LINEAR};
    use crate::infrastructure::persistence::InMemorySaveRepo;
    use branchline_domain::{EndingKind, FlagId, SaveGame, SceneId};

    fn manor() -> ScenarioId {
        ScenarioId::from("manor")
    }

    #[tokio::test]
    async fn fresh_scenario_is_not_resumable() {
        let harness = TestHarness::new(&[("manor", LINEAR)]).await;

        let result = harness
            .app
            .use_cases
            .session
            .enter
            .execute(&manor())
            .await
            .expect("enter should succeed");

        assert!(!result.resumable);
        assert_eq!(result.progress.scene().as_str(), "s1");
        assert_eq!(
            harness.app.stores.session.current_scenario().await,
            Some(manor())
        );
    }

    #[tokio::test]
    async fn moved_player_is_offered_resume() {
        let harness = TestHarness::new(&[("manor", LINEAR)]).await;
        harness.select(&manor(), 0).await;

        let result = harness
            .app
            .use_cases
            .session
            .enter
            .execute(&manor())
            .await
            .expect("enter should succeed");

        assert!(result.resumable);
        assert_eq!(result.progress.scene().as_str(), "s2");
    }

    #[tokio::test]
    async fn save_pointing_at_removed_scene_is_not_resumable() {
        let mut save = SaveGame::new("en");
        let mut stale = ScenarioProgress::new(SceneId::from("s1"));
        stale.relocate(SceneId::from("cut_scene"));
        save.scenario_states.insert(manor(), stale);
        let harness =
            TestHarness::with_save_repo(&[("manor", LINEAR)], InMemorySaveRepo::with_save(save))
                .await;

        let result = harness
            .app
            .use_cases
            .session
            .enter
            .execute(&manor())
            .await
            .expect("enter should succeed");

        assert!(!result.resumable);
        assert_eq!(result.progress.scene().as_str(), "s1");
    }

    #[tokio::test]
    async fn flag_alone_makes_progress_resumable() {
        let harness = TestHarness::new(&[("manor", LINEAR)]).await;
        harness
            .app
            .entities
            .progress
            .set_flag(&manor(), FlagId::from("lamp_lit"))
            .await
            .expect("set flag");

        let result = harness
            .app
            .use_cases
            .session
            .enter
            .execute(&manor())
            .await
            .expect("enter should succeed");

        assert!(result.resumable);
    }

    #[tokio::test]
    async fn switching_scenario_drops_guide() {
        let harness =
            TestHarness::with_balance(&[("manor", LINEAR), ("attic", LINEAR)], 3).await;
        harness
            .app
            .use_cases
            .guide
            .activate(&manor(), EndingKind::Good)
            .await
            .expect("guide should activate");

        let result = harness
            .app
            .use_cases
            .session
            .enter
            .execute(&ScenarioId::from("attic"))
            .await
            .expect("enter should succeed");

        assert_eq!(
            result.events,
            vec![GameEvent::GuideStateChanged {
                active: false,
                target: None
            }]
        );
        assert!(!harness.app.stores.session.is_override_active().await);
    }

    #[tokio::test]
    async fn unknown_scenario_cannot_be_entered() {
        let harness = TestHarness::new(&[("manor", LINEAR)]).await;

        let result = harness
            .app
            .use_cases
            .session
            .enter
            .execute(&ScenarioId::from("cellar"))
            .await;

        assert!(matches!(result, Err(SessionError::Progress(_))));
    }

    #[tokio::test]
    async fn restart_clears_everything() {
        let harness = TestHarness::new(&[("manor", LINEAR)]).await;
        harness
            .app
            .entities
            .progress
            .set_flag(&manor(), FlagId::from("k1"))
            .await
            .expect("set flag");
        harness.select(&manor(), 0).await;

        let result = harness
            .app
            .use_cases
            .session
            .restart
            .execute(&manor())
            .await
            .expect("restart should succeed");

        let progress = result.progress;
        assert_eq!(progress.scene().as_str(), "s1");
        assert_eq!(progress.active_flags().count(), 0);
        assert!(progress.clues().is_empty());
        assert!(progress.history().is_empty());
        assert_eq!(
            result.events,
            vec![GameEvent::ProgressReset {
                scenario_id: manor()
            }]
        );
    }
}
