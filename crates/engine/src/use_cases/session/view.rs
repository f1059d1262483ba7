//! Scene view: what the presentation layer renders for the current scene.

use std::sync::Arc;

use branchline_domain::{
    EndingKind, ImageRef, MissingRequirements, ScenarioId, SceneId, TextKey,
};

use super::SessionError;
use crate::entities::ProgressStore;
use crate::infrastructure::ports::TextLookupPort;
use crate::stores::{SaveStateStore, SessionStore};
use crate::use_cases::choice::is_choice_available;
use crate::use_cases::guide::guided_choice_index;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceView {
    pub index: usize,
    pub text: String,
    pub available: bool,
    /// The active guide takes this choice.
    pub guided: bool,
    /// What the unlock dialog offers; set only while the choice is locked.
    pub locked_detail: Option<MissingRequirements>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneView {
    pub scenario_id: ScenarioId,
    pub scene_id: SceneId,
    pub title: Option<String>,
    pub body: String,
    pub image: Option<ImageRef>,
    pub choices: Vec<ChoiceView>,
    /// Ending of a finished run, else the scene's own tag.
    pub ending: Option<EndingKind>,
    pub guide_active: bool,
}

/// Build scene view use case.
pub struct BuildSceneView {
    progress: Arc<ProgressStore>,
    session: Arc<SessionStore>,
    save: Arc<SaveStateStore>,
    text: Arc<dyn TextLookupPort>,
}

impl BuildSceneView {
    pub fn new(
        progress: Arc<ProgressStore>,
        session: Arc<SessionStore>,
        save: Arc<SaveStateStore>,
        text: Arc<dyn TextLookupPort>,
    ) -> Self {
        Self {
            progress,
            session,
            save,
            text,
        }
    }

    pub async fn execute(&self, scenario_id: &ScenarioId) -> Result<SceneView, SessionError> {
        let graph = self.progress.graph(scenario_id)?;
        let progress = self.progress.open(scenario_id).await?;
        let scene = graph
            .get_scene(progress.scene().as_str())
            .ok_or_else(|| SessionError::SceneNotFound(progress.scene().clone()))?;

        let lang = self.save.lang().await;
        let guide = self.session.guide().await;
        let override_active = self.session.is_override_active().await;
        let guided = guided_choice_index(&guide, scenario_id, scene);

        // A finished run offers nothing to pick.
        let offered = match progress.ended() {
            Some(_) => &[][..],
            None => scene.choices(),
        };
        let choices = offered
            .iter()
            .enumerate()
            .map(|(index, choice)| {
                let available = is_choice_available(choice, &progress, override_active);
                let locked_detail =
                    (!available).then(|| choice.requirements().missing(&progress));
                ChoiceView {
                    index,
                    text: self.resolve(&lang, choice.text()),
                    available,
                    guided: guided == Some(index),
                    locked_detail,
                }
            })
            .collect();

        let image = scene
            .image()
            .and_then(|id| graph.resolve_image(id.as_str()))
            .cloned();

        Ok(SceneView {
            scenario_id: scenario_id.clone(),
            scene_id: scene.id().clone(),
            title: scene.title().map(|key| self.resolve(&lang, key)),
            body: self.resolve(&lang, scene.body()),
            image,
            choices,
            ending: progress.ended().or(scene.ending()),
            guide_active: guide.active,
        })
    }

    fn resolve(&self, lang: &str, key: &TextKey) -> String {
        self.text
            .lookup(lang, key.as_str())
            .unwrap_or_else(|| key.as_str().to_string())
    }
}
