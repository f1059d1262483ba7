//! Select choice use case.
//!
//! Executes a choice from the player's current scene: checks availability,
//! applies flag and clue effects, moves along `next` and hands terminal
//! scenes to the ending handler.

use std::sync::Arc;

use branchline_domain::{
    EndingKind, GameEvent, MissingRequirements, ScenarioId, ScenarioProgress, Scene, SceneGraph,
    SceneId,
};

use crate::entities::{ProgressError, ProgressStore};
use crate::use_cases::choice::ChoiceAvailability;
use crate::use_cases::ending::{EndingOutcome, HandleEnding};

/// What selecting a choice did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceOutcome {
    /// Moved to a non-terminal scene.
    Moved { scene_id: SceneId },
    /// Requirements not met; nothing changed.
    Locked { missing: MissingRequirements },
    /// The run reached an ending.
    Ended(EndingOutcome),
}

#[derive(Debug, Clone)]
pub struct ChoiceResult {
    pub outcome: ChoiceOutcome,
    /// Progress after the choice.
    pub progress: ScenarioProgress,
    pub events: Vec<GameEvent>,
}

/// Select choice use case.
pub struct SelectChoice {
    progress: Arc<ProgressStore>,
    availability: Arc<ChoiceAvailability>,
    ending: Arc<HandleEnding>,
}

impl SelectChoice {
    pub fn new(
        progress: Arc<ProgressStore>,
        availability: Arc<ChoiceAvailability>,
        ending: Arc<HandleEnding>,
    ) -> Self {
        Self {
            progress,
            availability,
            ending,
        }
    }

    /// Execute the choice at `choice_index` in the current scene.
    ///
    /// # Returns
    /// * `Ok(ChoiceResult)` - Moved, locked or ended
    /// * `Err(ChoiceError::DeadEnd)` - The choice leads nowhere; state unchanged
    /// * `Err(ChoiceError::RunEnded)` - The run already reached an ending
    pub async fn execute(
        &self,
        scenario_id: &ScenarioId,
        choice_index: usize,
    ) -> Result<ChoiceResult, ChoiceError> {
        let graph = self.progress.graph(scenario_id)?;
        let progress = self.progress.open(scenario_id).await?;
        ensure_running(scenario_id, &progress)?;
        let scene_id = progress.scene().clone();
        let scene = current_scene(&graph, &scene_id)?;
        let choice = scene
            .choice(choice_index)
            .ok_or_else(|| ChoiceError::UnknownChoice {
                scene_id: scene_id.clone(),
                index: choice_index,
            })?;

        if !self.availability.is_available(choice, &progress).await {
            let missing = self.availability.missing_requirements(choice, &progress);
            tracing::info!(
                scenario_id = %scenario_id,
                scene_id = %scene_id,
                choice_index,
                missing_all = ?missing.missing_all,
                missing_any = ?missing.missing_any,
                "Choice locked"
            );
            return Ok(ChoiceResult {
                outcome: ChoiceOutcome::Locked {
                    missing: missing.clone(),
                },
                progress,
                events: vec![GameEvent::ChoiceLocked {
                    scenario_id: scenario_id.clone(),
                    scene_id,
                    choice_index,
                    missing,
                }],
            });
        }

        if choice.next().is_none() && choice.ending().is_none() {
            tracing::warn!(
                scenario_id = %scenario_id,
                scene_id = %scene_id,
                choice_index,
                "Choice has no next scene"
            );
            return Err(ChoiceError::DeadEnd {
                scene_id,
                index: choice_index,
            });
        }

        let applied = self.progress.apply_choice(scenario_id, choice).await?;
        let arrived_id = applied.progress.scene().clone();
        let arrived = current_scene(&graph, &arrived_id)?;

        let mut events = Vec::new();
        let ending = if choice.next().is_some() {
            tracing::info!(
                scenario_id = %scenario_id,
                from = %applied.from,
                to = %arrived_id,
                "Scene changed"
            );
            events.push(GameEvent::SceneChanged {
                scenario_id: scenario_id.clone(),
                from: applied.from.clone(),
                to: arrived_id.clone(),
            });
            arrived.ending().or(choice.ending())
        } else {
            choice.ending()
        };

        let Some(kind) = ending else {
            return Ok(ChoiceResult {
                outcome: ChoiceOutcome::Moved {
                    scene_id: arrived_id,
                },
                progress: applied.progress,
                events,
            });
        };

        let progress = self.progress.finish(scenario_id, kind).await?;
        let (outcome, ending_events) = self.ending.execute(scenario_id, arrived, kind).await;
        events.extend(ending_events);

        Ok(ChoiceResult {
            outcome: ChoiceOutcome::Ended(outcome),
            progress,
            events,
        })
    }
}

/// Refuse to act on a run that already reached its ending.
pub(crate) fn ensure_running(
    scenario_id: &ScenarioId,
    progress: &ScenarioProgress,
) -> Result<(), ChoiceError> {
    match progress.ended() {
        Some(ending) => {
            tracing::info!(
                scenario_id = %scenario_id,
                scene_id = %progress.scene(),
                ending = %ending,
                "Run already ended"
            );
            Err(ChoiceError::RunEnded { ending })
        }
        None => Ok(()),
    }
}

fn current_scene<'a>(
    graph: &'a SceneGraph,
    scene_id: &SceneId,
) -> Result<&'a Scene, ChoiceError> {
    graph
        .get_scene(scene_id.as_str())
        .ok_or_else(|| ChoiceError::SceneNotFound(scene_id.clone()))
}

#[derive(Debug, thiserror::Error)]
pub enum ChoiceError {
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error("Scene not found: {0}")]
    SceneNotFound(SceneId),
    #[error("Scene {scene_id} has no choice {index}")]
    UnknownChoice { scene_id: SceneId, index: usize },
    #[error("Choice {index} of scene {scene_id} has no next scene")]
    DeadEnd { scene_id: SceneId, index: usize },
    #[error("The run reached the {ending} ending; restart to play again")]
    RunEnded { ending: EndingKind },
}
