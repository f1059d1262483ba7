//! Scenario progress aggregate - where a player stands in one scenario
//!
//! One instance exists per scenario id. It is the single source of truth
//! for the player's position and is persisted after every mutation.
//!
//! Persisted shape:
//!
//! ```json
//! { "scene": "s2", "flags": { "k1": true }, "clues": ["c1"], "history": ["s1"] }
//! ```
//!
//! A finished run also carries `"ended": "good"` until it is reset.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ClueId, EndingKind, FlagId, SceneId};

/// Mutable player state for one scenario.
///
/// # Invariants
///
/// - `clues` keeps insertion order and never holds duplicates
/// - a flag is set only while present with value `true`
/// - once `ended` is set the run is over; only `reset` clears it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioProgress {
    /// Empty only for corrupt saves, which the progress store repairs
    #[serde(default)]
    scene: SceneId,
    #[serde(default)]
    flags: BTreeMap<FlagId, bool>,
    #[serde(default)]
    clues: Vec<ClueId>,
    #[serde(default)]
    history: Vec<SceneId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ended: Option<EndingKind>,
}

impl ScenarioProgress {
    /// Fresh progress at the given start scene.
    pub fn new(start: SceneId) -> Self {
        Self {
            scene: start,
            flags: BTreeMap::new(),
            clues: Vec::new(),
            history: Vec::new(),
            ended: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn scene(&self) -> &SceneId {
        &self.scene
    }

    pub fn has_flag(&self, flag: &FlagId) -> bool {
        self.flags.get(flag).copied().unwrap_or(false)
    }

    /// Flags currently set, in sorted order.
    pub fn active_flags(&self) -> impl Iterator<Item = &FlagId> + '_ {
        self.flags
            .iter()
            .filter(|(_, set)| **set)
            .map(|(flag, _)| flag)
    }

    #[inline]
    pub fn clues(&self) -> &[ClueId] {
        &self.clues
    }

    #[inline]
    pub fn history(&self) -> &[SceneId] {
        &self.history
    }

    /// Ending the run finished with, if it is over.
    #[inline]
    pub fn ended(&self) -> Option<EndingKind> {
        self.ended
    }

    /// True when the player has done anything worth resuming.
    pub fn is_meaningful(&self, start: &SceneId) -> bool {
        &self.scene != start
            || self.active_flags().next().is_some()
            || !self.clues.is_empty()
            || self.ended.is_some()
    }

    // =========================================================================
    // Mutation Methods
    // =========================================================================

    /// Returns `true` if the flag was not already set.
    pub fn set_flag(&mut self, flag: FlagId) -> bool {
        self.flags.insert(flag, true) != Some(true)
    }

    /// Returns `true` if the flag was set.
    pub fn clear_flag(&mut self, flag: &FlagId) -> bool {
        self.flags.remove(flag) == Some(true)
    }

    /// Returns `true` if the clue is new.
    pub fn add_clue(&mut self, clue: ClueId) -> bool {
        if self.clues.contains(&clue) {
            return false;
        }
        self.clues.push(clue);
        true
    }

    /// Leave the current scene for `next`, remembering it for "go back".
    pub fn advance_to(&mut self, next: SceneId) {
        let previous = std::mem::replace(&mut self.scene, next);
        self.history.push(previous);
    }

    /// Close the run on an ending. The first ending reached is kept.
    pub fn finish(&mut self, kind: EndingKind) {
        self.ended.get_or_insert(kind);
    }

    /// Return to the most recently left scene.
    ///
    /// Returns the scene that was left, or `None` with an empty history or
    /// a finished run.
    pub fn go_back(&mut self) -> Option<SceneId> {
        if self.ended.is_some() {
            return None;
        }
        let previous = self.history.pop()?;
        Some(std::mem::replace(&mut self.scene, previous))
    }

    /// Point the progress at a scene without touching history
    /// (used to repair a pointer into a scene that no longer exists).
    pub fn relocate(&mut self, scene: SceneId) {
        self.scene = scene;
    }

    /// Back to the start with no flags, clues or history.
    pub fn reset(&mut self, start: SceneId) {
        *self = Self::new(start);
    }
}
