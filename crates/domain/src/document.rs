//! Serialized shape of a scenario as delivered by the content loader.
//!
//! These types mirror the raw data one-to-one and carry no invariants.
//! `SceneGraph::from_document` turns them into the validated model.
//!
//! ```json
//! {
//!   "start_scene": "s1",
//!   "meta": { "start_scene": "s1" },
//!   "scenes": { "s1": { "text": "s1.body", "choices": [{ "next": "s2" }] } },
//!   "images": { "hall": { "file": "hall.png", "alt": "The great hall" } }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level scenario document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioDocument {
    #[serde(default)]
    pub start_scene: Option<String>,
    #[serde(default)]
    pub meta: Option<ScenarioMeta>,
    /// Scenes in load order; kept as raw values so each scene can be
    /// validated (and reported) on its own.
    #[serde(default)]
    pub scenes: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub images: BTreeMap<String, ImageDocument>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioMeta {
    #[serde(default)]
    pub start_scene: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Body text key; defaults to the scene id
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChoiceDocument>,
    #[serde(default)]
    pub ending: Option<String>,
    #[serde(default)]
    pub ending_title: Option<String>,
    #[serde(default)]
    pub ending_text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChoiceDocument {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub ending: Option<String>,
    #[serde(default)]
    pub requires_all_flags: Vec<String>,
    #[serde(default)]
    pub requires_any_flags: Vec<String>,
    #[serde(default)]
    pub set_flags: Vec<String>,
    #[serde(default)]
    pub clear_flags: Vec<String>,
    #[serde(default)]
    pub add_clue: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageDocument {
    pub file: String,
    #[serde(default)]
    pub alt: String,
}
