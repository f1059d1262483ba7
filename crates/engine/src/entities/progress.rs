//! Progress entity module.
//!
//! Owns every `ScenarioProgress` in the save. Each operation opens the
//! scenario's progress (creating it at the start scene, or snapping a
//! pointer into a missing scene back to the start), applies its change and
//! persists before returning.

use std::sync::Arc;

use branchline_domain::{
    Choice, ClueId, EndingKind, FlagId, GraphError, SaveGame, ScenarioId, ScenarioProgress,
    SceneGraph, SceneId,
};

use crate::entities::ScenarioCatalog;
use crate::stores::SaveStateStore;

#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("Unknown scenario: {0}")]
    UnknownScenario(ScenarioId),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Effect of executing a choice on the progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedChoice {
    /// Scene the choice was taken from.
    pub from: SceneId,
    /// Progress after the choice.
    pub progress: ScenarioProgress,
}

impl AppliedChoice {
    pub fn moved(&self) -> bool {
        self.progress.scene() != &self.from
    }
}

pub struct ProgressStore {
    catalog: Arc<ScenarioCatalog>,
    save: Arc<SaveStateStore>,
}

impl ProgressStore {
    pub fn new(catalog: Arc<ScenarioCatalog>, save: Arc<SaveStateStore>) -> Self {
        Self { catalog, save }
    }

    pub fn graph(&self, scenario_id: &ScenarioId) -> Result<Arc<SceneGraph>, ProgressError> {
        self.catalog
            .get(scenario_id)
            .ok_or_else(|| ProgressError::UnknownScenario(scenario_id.clone()))
    }

    /// Progress for the scenario, created or repaired as needed.
    pub async fn open(&self, scenario_id: &ScenarioId) -> Result<ScenarioProgress, ProgressError> {
        self.mutate(scenario_id, |progress| progress.clone()).await
    }

    /// Stored progress without creating it.
    pub async fn get(&self, scenario_id: &ScenarioId) -> Option<ScenarioProgress> {
        self.save
            .read(|save| save.progress(scenario_id).cloned())
            .await
    }

    /// True when resuming is worth offering.
    pub async fn has_meaningful_progress(
        &self,
        scenario_id: &ScenarioId,
    ) -> Result<bool, ProgressError> {
        let graph = self.graph(scenario_id)?;
        let start = graph.resolve_start_scene()?;
        Ok(self
            .save
            .read(|save| {
                save.progress(scenario_id)
                    .map(|progress| progress.is_meaningful(start))
                    .unwrap_or(false)
            })
            .await)
    }

    /// Back to the start scene with no flags, clues or history.
    pub async fn hard_reset(
        &self,
        scenario_id: &ScenarioId,
    ) -> Result<ScenarioProgress, ProgressError> {
        let graph = self.graph(scenario_id)?;
        let start = graph.resolve_start_scene()?.clone();
        let progress = self
            .save
            .update(|save| {
                let progress = ScenarioProgress::new(start);
                save.scenario_states
                    .insert(scenario_id.clone(), progress.clone());
                progress
            })
            .await;
        tracing::info!(scenario_id = %scenario_id, "Progress reset to start scene");
        Ok(progress)
    }

    pub async fn set_flag(
        &self,
        scenario_id: &ScenarioId,
        flag: FlagId,
    ) -> Result<bool, ProgressError> {
        self.mutate(scenario_id, |progress| progress.set_flag(flag))
            .await
    }

    pub async fn clear_flag(
        &self,
        scenario_id: &ScenarioId,
        flag: &FlagId,
    ) -> Result<bool, ProgressError> {
        self.mutate(scenario_id, |progress| progress.clear_flag(flag))
            .await
    }

    pub async fn add_clue(
        &self,
        scenario_id: &ScenarioId,
        clue: ClueId,
    ) -> Result<bool, ProgressError> {
        self.mutate(scenario_id, |progress| progress.add_clue(clue))
            .await
    }

    /// Set several flags in one write.
    pub async fn grant_flags(
        &self,
        scenario_id: &ScenarioId,
        flags: &[FlagId],
    ) -> Result<ScenarioProgress, ProgressError> {
        self.mutate(scenario_id, |progress| {
            for flag in flags {
                progress.set_flag(flag.clone());
            }
            progress.clone()
        })
        .await
    }

    /// Apply a choice's flag and clue effects, then follow its `next`.
    ///
    /// Flags are set before they are cleared, so a flag named in both lists
    /// ends up cleared.
    pub async fn apply_choice(
        &self,
        scenario_id: &ScenarioId,
        choice: &Choice,
    ) -> Result<AppliedChoice, ProgressError> {
        self.mutate(scenario_id, |progress| {
            for flag in choice.set_flags() {
                progress.set_flag(flag.clone());
            }
            for flag in choice.clear_flags() {
                progress.clear_flag(flag);
            }
            if let Some(clue) = choice.add_clue() {
                progress.add_clue(clue.clone());
            }
            let from = progress.scene().clone();
            if let Some(next) = choice.next() {
                progress.advance_to(next.clone());
            }
            AppliedChoice {
                from,
                progress: progress.clone(),
            }
        })
        .await
    }

    /// Close the run on `kind`. Choices and going back stay refused until
    /// a hard reset.
    pub async fn finish(
        &self,
        scenario_id: &ScenarioId,
        kind: EndingKind,
    ) -> Result<ScenarioProgress, ProgressError> {
        self.mutate(scenario_id, |progress| {
            progress.finish(kind);
            progress.clone()
        })
        .await
    }

    /// Step back one scene. Returns `(left, now_at)`, or `None` with no history.
    pub async fn go_back(
        &self,
        scenario_id: &ScenarioId,
    ) -> Result<Option<(SceneId, SceneId)>, ProgressError> {
        self.mutate(scenario_id, |progress| {
            progress
                .go_back()
                .map(|left| (left, progress.scene().clone()))
        })
        .await
    }

    async fn mutate<R>(
        &self,
        scenario_id: &ScenarioId,
        f: impl FnOnce(&mut ScenarioProgress) -> R,
    ) -> Result<R, ProgressError> {
        let graph = self.graph(scenario_id)?;
        let start = graph.resolve_start_scene()?;
        Ok(self
            .save
            .update(|save| f(ensure_progress(save, &graph, scenario_id, start)))
            .await)
    }
}

fn ensure_progress<'a>(
    save: &'a mut SaveGame,
    graph: &SceneGraph,
    scenario_id: &ScenarioId,
    start: &SceneId,
) -> &'a mut ScenarioProgress {
    let progress = save
        .scenario_states
        .entry(scenario_id.clone())
        .or_insert_with(|| {
            tracing::info!(scenario_id = %scenario_id, start = %start, "Created scenario progress");
            ScenarioProgress::new(start.clone())
        });

    if !graph.contains_scene(progress.scene().as_str()) {
        tracing::warn!(
            scenario_id = %scenario_id,
            scene_id = %progress.scene(),
            start = %start,
            "Progress points at a missing scene, returning to start"
        );
        progress.relocate(start.clone());
    }

    progress
}
