//! Scene graph aggregate - the read-only narrative graph of one scenario
//!
//! Built once from a `ScenarioDocument` and never mutated afterwards.
//! Loading validates the document and fails fast with a `GraphError`
//! rather than letting malformed data reach gameplay.

use std::collections::HashMap;

use crate::document::{ChoiceDocument, ScenarioDocument, SceneDocument};
use crate::error::GraphError;
use crate::value_objects::FlagRequirements;
use crate::{Choice, ClueId, EndingKind, FlagId, ImageId, ImageRef, ScenarioId, Scene, SceneId};

/// The narrative graph of a scenario.
///
/// # Invariants
///
/// - Every choice `next` names a scene of the graph
/// - A declared start scene is part of the graph
/// - Scene endings are resolved (explicit or inferred) at load
#[derive(Debug, Clone)]
pub struct SceneGraph {
    scenario_id: ScenarioId,
    declared_start: Option<SceneId>,
    /// Scene ids in load order
    order: Vec<SceneId>,
    scenes: HashMap<SceneId, Scene>,
    images: HashMap<ImageId, ImageRef>,
}

impl SceneGraph {
    /// Build a graph from already-constructed scenes (in load order).
    pub fn new(
        scenario_id: impl Into<ScenarioId>,
        scenes: Vec<Scene>,
        images: HashMap<ImageId, ImageRef>,
        declared_start: Option<SceneId>,
    ) -> Result<Self, GraphError> {
        let scenario_id = scenario_id.into();
        let mut order = Vec::with_capacity(scenes.len());
        let mut by_id: HashMap<SceneId, Scene> = HashMap::with_capacity(scenes.len());

        for scene in scenes {
            if scene.id().is_blank() {
                return Err(GraphError::malformed(
                    format!("scenario {}", scenario_id),
                    "scene with an empty id",
                ));
            }
            let scene = scene.normalize_ending();
            if by_id.contains_key(scene.id()) {
                return Err(GraphError::malformed(
                    format!("scene {}", scene.id()),
                    "duplicate scene id",
                ));
            }
            order.push(scene.id().clone());
            by_id.insert(scene.id().clone(), scene);
        }

        let graph = Self {
            scenario_id,
            declared_start,
            order,
            scenes: by_id,
            images,
        };
        graph.validate()?;
        Ok(graph)
    }

    /// Build a graph from a parsed scenario document.
    pub fn from_document(
        scenario_id: impl Into<ScenarioId>,
        document: ScenarioDocument,
    ) -> Result<Self, GraphError> {
        let ScenarioDocument {
            start_scene,
            meta,
            scenes,
            images,
        } = document;

        let declared_start = start_scene
            .or_else(|| meta.and_then(|m| m.start_scene))
            .filter(|id| !id.trim().is_empty())
            .map(SceneId::from);

        let images = images
            .into_iter()
            .map(|(id, image)| {
                if image.file.trim().is_empty() {
                    return Err(GraphError::malformed(format!("image {}", id), "missing file"));
                }
                Ok((
                    ImageId::from(id),
                    ImageRef {
                        file: image.file,
                        alt: image.alt,
                    },
                ))
            })
            .collect::<Result<HashMap<_, _>, _>>()?;

        let scenes = scenes
            .into_iter()
            .map(|(id, value)| {
                let document: SceneDocument = serde_json::from_value(value)
                    .map_err(|e| GraphError::malformed(format!("scene {}", id), e))?;
                scene_from_document(id, document)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(scenario_id, scenes, images, declared_start)
    }

    /// Parse and validate a scenario from raw JSON.
    pub fn from_json(scenario_id: impl Into<ScenarioId>, json: &str) -> Result<Self, GraphError> {
        let document: ScenarioDocument = serde_json::from_str(json)?;
        Self::from_document(scenario_id, document)
    }

    fn validate(&self) -> Result<(), GraphError> {
        if let Some(start) = &self.declared_start {
            if !self.scenes.contains_key(start) {
                return Err(GraphError::UnknownStartScene {
                    scenario_id: self.scenario_id.to_string(),
                    scene_id: start.to_string(),
                });
            }
        }

        for scene in self.scenes() {
            for (index, choice) in scene.choices().iter().enumerate() {
                if let Some(next) = choice.next() {
                    if !self.scenes.contains_key(next) {
                        return Err(GraphError::DanglingChoice {
                            scene_id: scene.id().to_string(),
                            choice_index: index,
                            target: next.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    #[inline]
    pub fn scenario_id(&self) -> &ScenarioId {
        &self.scenario_id
    }

    /// The declared start scene, else the first scene in load order.
    pub fn resolve_start_scene(&self) -> Result<&SceneId, GraphError> {
        self.declared_start
            .as_ref()
            .or_else(|| self.order.first())
            .ok_or_else(|| GraphError::EmptyGraph {
                scenario_id: self.scenario_id.to_string(),
            })
    }

    pub fn get_scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.get(id)
    }

    pub fn contains_scene(&self, id: &str) -> bool {
        self.scenes.contains_key(id)
    }

    pub fn resolve_image(&self, id: &str) -> Option<&ImageRef> {
        self.images.get(id)
    }

    /// Scenes in load order.
    pub fn scenes(&self) -> impl Iterator<Item = &Scene> + '_ {
        self.order.iter().filter_map(|id| self.scenes.get(id))
    }

    pub fn scene_count(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn scene_from_document(id: String, document: SceneDocument) -> Result<Scene, GraphError> {
    let location = format!("scene {}", id);
    let body = document.text.clone().unwrap_or_else(|| id.clone());

    let choices = document
        .choices
        .into_iter()
        .enumerate()
        .map(|(index, choice)| choice_from_document(&id, index, choice))
        .collect::<Result<Vec<_>, _>>()?;

    let mut scene = Scene::new(id, body).with_choices(choices).with_ending_text(
        non_blank(document.ending_title).map(Into::into),
        non_blank(document.ending_text).map(Into::into),
    );
    if let Some(title) = non_blank(document.title) {
        scene = scene.with_title(title);
    }
    if let Some(image) = non_blank(document.image) {
        scene = scene.with_image(image);
    }
    if let Some(ending) = parse_ending(document.ending, &location)? {
        scene = scene.with_ending(ending);
    }
    Ok(scene)
}

fn choice_from_document(
    scene_id: &str,
    index: usize,
    document: ChoiceDocument,
) -> Result<Choice, GraphError> {
    let location = format!("choice {} of scene {}", index, scene_id);
    let requirements = FlagRequirements::new(
        to_flags(document.requires_all_flags),
        to_flags(document.requires_any_flags),
    );

    let mut choice = Choice::new(document.text)
        .with_requirements(requirements)
        .with_set_flags(to_flags(document.set_flags))
        .with_clear_flags(to_flags(document.clear_flags));
    if let Some(next) = non_blank(document.next) {
        choice = choice.with_next(next);
    }
    if let Some(ending) = parse_ending(document.ending, &location)? {
        choice = choice.with_ending(ending);
    }
    if let Some(clue) = non_blank(document.add_clue) {
        choice = choice.with_clue(ClueId::from(clue));
    }
    Ok(choice)
}

/// An empty tag means "not an ending"; anything else must be a known kind.
fn parse_ending(tag: Option<String>, location: &str) -> Result<Option<EndingKind>, GraphError> {
    match non_blank(tag) {
        None => Ok(None),
        Some(tag) => tag
            .parse()
            .map(Some)
            .map_err(|_| GraphError::UnknownEnding {
                location: location.to_string(),
                tag,
            }),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn to_flags(values: Vec<String>) -> Vec<FlagId> {
    values
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .map(FlagId::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn graph(value: serde_json::Value) -> Result<SceneGraph, GraphError> {
        let document: ScenarioDocument = serde_json::from_value(value).unwrap();
        SceneGraph::from_document("test", document)
    }

    fn linear() -> serde_json::Value {
        json!({
            "start_scene": "s1",
            "scenes": {
                "s1": { "choices": [{ "text": "go", "next": "s2" }] },
                "s2": { "choices": [{ "text": "go", "next": "end_good" }] },
                "end_good": { "ending": "good", "choices": [] }
            }
        })
    }

    #[test]
    fn declared_start_scene_wins() {
        let graph = graph(json!({
            "start_scene": "s2",
            "scenes": { "s1": {}, "s2": {} }
        }))
        .unwrap();
        assert_eq!(graph.resolve_start_scene().unwrap().as_str(), "s2");
    }

    #[test]
    fn meta_start_scene_is_honoured() {
        let graph = graph(json!({
            "meta": { "start_scene": "s2" },
            "scenes": { "s1": {}, "s2": {} }
        }))
        .unwrap();
        assert_eq!(graph.resolve_start_scene().unwrap().as_str(), "s2");
    }

    #[test]
    fn first_scene_in_load_order_is_the_fallback_start() {
        let graph = graph(json!({
            "scenes": { "zeta": {}, "alpha": {} }
        }))
        .unwrap();
        assert_eq!(graph.resolve_start_scene().unwrap().as_str(), "zeta");
        let ids: Vec<_> = graph.scenes().map(|s| s.id().as_str()).collect();
        assert_eq!(ids, vec!["zeta", "alpha"]);
    }

    #[test]
    fn empty_graph_has_no_start() {
        let graph = graph(json!({ "scenes": {} })).unwrap();
        assert!(matches!(
            graph.resolve_start_scene(),
            Err(GraphError::EmptyGraph { .. })
        ));
    }

    #[test]
    fn unknown_start_scene_is_rejected() {
        let err = graph(json!({
            "start_scene": "missing",
            "scenes": { "s1": {} }
        }))
        .unwrap_err();
        assert!(matches!(err, GraphError::UnknownStartScene { .. }));
    }

    #[test]
    fn dangling_next_is_rejected() {
        let err = graph(json!({
            "scenes": { "s1": { "choices": [{ "next": "nowhere" }] } }
        }))
        .unwrap_err();
        assert_eq!(
            err,
            GraphError::DanglingChoice {
                scene_id: "s1".into(),
                choice_index: 0,
                target: "nowhere".into()
            }
        );
    }

    #[test]
    fn unknown_ending_tag_is_rejected() {
        let err = graph(json!({
            "scenes": { "s1": { "ending": "meh" } }
        }))
        .unwrap_err();
        assert!(matches!(err, GraphError::UnknownEnding { .. }));
    }

    #[test]
    fn malformed_scene_reports_its_id() {
        let err = graph(json!({
            "scenes": { "s1": { "choices": "not a list" } }
        }))
        .unwrap_err();
        match err {
            GraphError::Malformed { location, .. } => assert_eq!(location, "scene s1"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn scenes_are_loaded_with_choices_and_endings() {
        let graph = graph(linear()).unwrap();
        assert_eq!(graph.scene_count(), 3);
        let s1 = graph.get_scene("s1").unwrap();
        assert_eq!(s1.body().as_str(), "s1");
        assert_eq!(s1.choices()[0].next().unwrap().as_str(), "s2");
        assert_eq!(
            graph.get_scene("end_good").unwrap().ending(),
            Some(EndingKind::Good)
        );
    }

    #[test]
    fn ending_is_inferred_from_id_without_tag() {
        let graph = graph(json!({
            "scenes": {
                "s1": { "choices": [{ "next": "END_BAD" }] },
                "END_BAD": { "ending": "" }
            }
        }))
        .unwrap();
        assert_eq!(
            graph.get_scene("END_BAD").unwrap().ending(),
            Some(EndingKind::Bad)
        );
        assert_eq!(graph.get_scene("s1").unwrap().ending(), None);
    }

    #[test]
    fn choice_flags_and_clues_are_parsed() {
        let graph = graph(json!({
            "scenes": {
                "s1": { "choices": [{
                    "text": "open",
                    "next": "s1",
                    "requires_all_flags": ["k1"],
                    "requires_any_flags": ["a", "b"],
                    "set_flags": ["door_open"],
                    "clear_flags": ["k1"],
                    "add_clue": "scratches"
                }] }
            }
        }))
        .unwrap();
        let choice = &graph.get_scene("s1").unwrap().choices()[0];
        assert_eq!(choice.requirements().all(), &[FlagId::from("k1")]);
        assert_eq!(choice.requirements().any().len(), 2);
        assert_eq!(choice.set_flags(), &[FlagId::from("door_open")]);
        assert_eq!(choice.clear_flags(), &[FlagId::from("k1")]);
        assert_eq!(choice.add_clue(), Some(&ClueId::from("scratches")));
    }

    #[test]
    fn images_resolve_by_id() {
        let graph = graph(json!({
            "scenes": { "s1": { "image": "hall" } },
            "images": { "hall": { "file": "hall.png", "alt": "The hall" } }
        }))
        .unwrap();
        let image = graph.resolve_image("hall").unwrap();
        assert_eq!(image.file, "hall.png");
        assert!(graph.resolve_image("cellar").is_none());
    }

    #[test]
    fn from_json_reports_syntax_errors() {
        assert!(matches!(
            SceneGraph::from_json("broken", "{ not json"),
            Err(GraphError::Malformed { .. })
        ));
    }

    #[test]
    fn start_resolution_is_deterministic() {
        let first = graph(linear()).unwrap();
        let second = graph(linear()).unwrap();
        assert_eq!(
            first.resolve_start_scene().unwrap(),
            second.resolve_start_scene().unwrap()
        );
        assert!(first.contains_scene(first.resolve_start_scene().unwrap().as_str()));
    }
}
