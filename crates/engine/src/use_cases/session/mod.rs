//! Session use cases.
//!
//! Entering a scenario, restarting it and building what the presentation
//! layer shows for the current scene.

use std::sync::Arc;

use branchline_domain::SceneId;

use crate::entities::ProgressError;

mod enter;
mod view;

pub use enter::{EnterResult, EnterScenario, RestartResult, RestartScenario};
pub use view::{BuildSceneView, ChoiceView, SceneView};

/// Container for session use cases.
pub struct SessionUseCases {
    pub enter: Arc<EnterScenario>,
    pub restart: Arc<RestartScenario>,
    pub view: Arc<BuildSceneView>,
}

impl SessionUseCases {
    pub fn new(
        enter: Arc<EnterScenario>,
        restart: Arc<RestartScenario>,
        view: Arc<BuildSceneView>,
    ) -> Self {
        Self {
            enter,
            restart,
            view,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error("Scene not found: {0}")]
    SceneNotFound(SceneId),
}
