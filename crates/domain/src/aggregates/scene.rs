//! Scene aggregate - one node of a scenario's narrative graph
//!
//! Scenes are immutable once a scenario is loaded. The only mutable part
//! of a run is the player's `ScenarioProgress`.
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: All fields are encapsulated
//! - **Valid by construction**: built by `SceneGraph` from a validated document
//! - **Builder pattern**: Fluent API for optional fields

use serde::{Deserialize, Serialize};

use crate::value_objects::FlagRequirements;
use crate::{ClueId, EndingKind, FlagId, ImageId, SceneId, TextKey};

/// A scene - display text plus the choices leading out of it
///
/// # Example
///
/// ```
/// use branchline_domain::{Choice, Scene};
///
/// let scene = Scene::new("cellar", "cellar.body")
///     .with_choice(Choice::new("cellar.leave").with_next("end_bad"));
///
/// assert_eq!(scene.id().as_str(), "cellar");
/// assert_eq!(scene.choices().len(), 1);
/// assert!(scene.ending().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    id: SceneId,
    title: Option<TextKey>,
    body: TextKey,
    image: Option<ImageId>,
    choices: Vec<Choice>,
    /// Resolved ending: explicit tag, or inferred from the id at load
    ending: Option<EndingKind>,
    /// Scene-specific ending text, preferred over the generic ending text
    ending_title: Option<TextKey>,
    ending_body: Option<TextKey>,
}

impl Scene {
    pub fn new(id: impl Into<SceneId>, body: impl Into<TextKey>) -> Self {
        Self {
            id: id.into(),
            title: None,
            body: body.into(),
            image: None,
            choices: Vec::new(),
            ending: None,
            ending_title: None,
            ending_body: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> &SceneId {
        &self.id
    }

    #[inline]
    pub fn title(&self) -> Option<&TextKey> {
        self.title.as_ref()
    }

    #[inline]
    pub fn body(&self) -> &TextKey {
        &self.body
    }

    #[inline]
    pub fn image(&self) -> Option<&ImageId> {
        self.image.as_ref()
    }

    #[inline]
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn choice(&self, index: usize) -> Option<&Choice> {
        self.choices.get(index)
    }

    /// The scene's ending category, if it is terminal.
    #[inline]
    pub fn ending(&self) -> Option<EndingKind> {
        self.ending
    }

    #[inline]
    pub fn ending_title(&self) -> Option<&TextKey> {
        self.ending_title.as_ref()
    }

    #[inline]
    pub fn ending_body(&self) -> Option<&TextKey> {
        self.ending_body.as_ref()
    }

    /// A scene without choices cannot be left; it is terminal by definition.
    pub fn has_no_choices(&self) -> bool {
        self.choices.is_empty()
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    pub fn with_title(mut self, title: impl Into<TextKey>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<ImageId>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }

    pub fn with_ending(mut self, ending: EndingKind) -> Self {
        self.ending = Some(ending);
        self
    }

    pub fn with_ending_text(
        mut self,
        title: Option<TextKey>,
        body: Option<TextKey>,
    ) -> Self {
        self.ending_title = title;
        self.ending_body = body;
        self
    }

    /// Fill in the ending from the `end_<kind>` id convention when no
    /// explicit tag was given.
    pub(crate) fn normalize_ending(mut self) -> Self {
        if self.ending.is_none() {
            self.ending = EndingKind::infer_from_scene_id(self.id.as_str());
        }
        self
    }
}

/// Where selecting a choice leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceTarget<'a> {
    /// Move to another scene
    Scene(&'a SceneId),
    /// End the run directly, without moving
    Ending(EndingKind),
    /// Neither `next` nor `ending`; selecting it must be reported
    DeadEnd,
}

/// An outgoing edge (or ending leaf) of a scene.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    text: TextKey,
    next: Option<SceneId>,
    ending: Option<EndingKind>,
    requirements: FlagRequirements,
    set_flags: Vec<FlagId>,
    clear_flags: Vec<FlagId>,
    add_clue: Option<ClueId>,
}

impl Choice {
    pub fn new(text: impl Into<TextKey>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn text(&self) -> &TextKey {
        &self.text
    }

    #[inline]
    pub fn next(&self) -> Option<&SceneId> {
        self.next.as_ref()
    }

    #[inline]
    pub fn ending(&self) -> Option<EndingKind> {
        self.ending
    }

    #[inline]
    pub fn requirements(&self) -> &FlagRequirements {
        &self.requirements
    }

    #[inline]
    pub fn set_flags(&self) -> &[FlagId] {
        &self.set_flags
    }

    #[inline]
    pub fn clear_flags(&self) -> &[FlagId] {
        &self.clear_flags
    }

    #[inline]
    pub fn add_clue(&self) -> Option<&ClueId> {
        self.add_clue.as_ref()
    }

    /// A `next` scene wins over an ending tag; the tag then only applies if
    /// the destination scene is not itself an ending.
    pub fn target(&self) -> ChoiceTarget<'_> {
        match (&self.next, self.ending) {
            (Some(next), _) => ChoiceTarget::Scene(next),
            (None, Some(ending)) => ChoiceTarget::Ending(ending),
            (None, None) => ChoiceTarget::DeadEnd,
        }
    }

    pub fn with_next(mut self, next: impl Into<SceneId>) -> Self {
        self.next = Some(next.into());
        self
    }

    pub fn with_ending(mut self, ending: EndingKind) -> Self {
        self.ending = Some(ending);
        self
    }

    pub fn with_requirements(mut self, requirements: FlagRequirements) -> Self {
        self.requirements = requirements;
        self
    }

    pub fn with_set_flags(mut self, flags: Vec<FlagId>) -> Self {
        self.set_flags = flags;
        self
    }

    pub fn with_clear_flags(mut self, flags: Vec<FlagId>) -> Self {
        self.clear_flags = flags;
        self
    }

    pub fn with_clue(mut self, clue: impl Into<ClueId>) -> Self {
        self.add_clue = Some(clue.into());
        self
    }
}

/// A displayable image declared by the scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub file: String,
    pub alt: String,
}
