//! Go back use case.

use std::sync::Arc;

use branchline_domain::{GameEvent, ScenarioId};

use crate::entities::ProgressStore;
use crate::use_cases::choice::{ensure_running, ChoiceError};

/// Return to the previously visited scene.
pub struct GoBack {
    progress: Arc<ProgressStore>,
}

impl GoBack {
    pub fn new(progress: Arc<ProgressStore>) -> Self {
        Self { progress }
    }

    /// Returns the scene change, or `None` when there is no history.
    /// A run that reached its ending cannot be stepped back out of.
    pub async fn execute(
        &self,
        scenario_id: &ScenarioId,
    ) -> Result<Option<GameEvent>, ChoiceError> {
        let progress = self.progress.open(scenario_id).await?;
        ensure_running(scenario_id, &progress)?;

        match self.progress.go_back(scenario_id).await? {
            Some((from, to)) => {
                tracing::info!(scenario_id = %scenario_id, from = %from, to = %to, "Went back");
                Ok(Some(GameEvent::SceneChanged {
                    scenario_id: scenario_id.clone(),
                    from,
                    to,
                }))
            }
            None => {
                tracing::info!(scenario_id = %scenario_id, "Nothing to go back to");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::e2e_tests::e2e_helpers::{TestHarness, LINEAR};
    use branchline_domain::{EndingKind, SceneId};

    #[tokio::test]
    async fn back_after_choice_returns_to_previous_scene() {
        let harness = TestHarness::new(&[("manor", LINEAR)]).await;
        let manor = ScenarioId::from("manor");
        harness.select(&manor, 0).await;

        let event = harness
            .app
            .use_cases
            .choice
            .back
            .execute(&manor)
            .await
            .expect("back should succeed");

        assert_eq!(
            event,
            Some(GameEvent::SceneChanged {
                scenario_id: manor.clone(),
                from: SceneId::from("s2"),
                to: SceneId::from("s1"),
            })
        );
        assert_eq!(harness.current_scene(&manor).await, "s1");
    }

    #[tokio::test]
    async fn back_at_start_is_a_no_op() {
        let harness = TestHarness::new(&[("manor", LINEAR)]).await;
        let manor = ScenarioId::from("manor");

        let event = harness
            .app
            .use_cases
            .choice
            .back
            .execute(&manor)
            .await
            .expect("back should succeed");

        assert_eq!(event, None);
        assert_eq!(harness.current_scene(&manor).await, "s1");
    }

    #[tokio::test]
    async fn back_from_an_ending_is_refused() {
        let harness = TestHarness::new(&[("manor", LINEAR)]).await;
        let manor = ScenarioId::from("manor");
        harness.select(&manor, 0).await;
        harness.select(&manor, 0).await;

        let result = harness.app.use_cases.choice.back.execute(&manor).await;

        assert!(matches!(
            result,
            Err(ChoiceError::RunEnded {
                ending: EndingKind::Good
            })
        ));
        assert_eq!(harness.current_scene(&manor).await, "end_good");
    }
}
