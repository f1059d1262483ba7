//! A planned route from the player's scene to an ending.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{EndingKind, SceneId};

/// Shortest scene path towards a requested ending category.
///
/// # Invariants
///
/// - `path` is never empty; it starts at the scene the plan was computed
///   from and ends at a target scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidePlan {
    target: EndingKind,
    path: Vec<SceneId>,
}

impl GuidePlan {
    /// Returns `None` for an empty path.
    pub fn new(target: EndingKind, path: Vec<SceneId>) -> Option<Self> {
        if path.is_empty() {
            return None;
        }
        Some(Self { target, path })
    }

    pub fn target(&self) -> EndingKind {
        self.target
    }

    /// Full scene sequence, start and target inclusive.
    pub fn path(&self) -> &[SceneId] {
        &self.path
    }

    pub fn start(&self) -> Option<&SceneId> {
        self.path.first()
    }

    pub fn destination(&self) -> Option<&SceneId> {
        self.path.last()
    }

    /// Number of choices the plan takes.
    pub fn edge_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Each scene on the path (except the last) mapped to the scene after it.
    pub fn next_by_scene(&self) -> HashMap<SceneId, SceneId> {
        self.path
            .windows(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect()
    }
}
