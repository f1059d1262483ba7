extern crate self as branchline_domain;

pub mod aggregates;
pub mod document;
pub mod error;
pub mod events;
pub mod ids;
pub mod types;
pub mod value_objects;

pub use aggregates::{
    Choice, ChoiceTarget, ImageRef, PlayerProfile, SaveGame, ScenarioProgress, Scene, SceneGraph,
};

pub use document::{ChoiceDocument, ImageDocument, ScenarioDocument, ScenarioMeta, SceneDocument};

pub use error::{DomainError, GraphError};
pub use events::{GameEvent, GrantSource};

// Re-export ID types
pub use ids::{ClueId, CurrencyKind, FlagId, ImageId, ScenarioId, SceneId, TextKey};

pub use types::EndingKind;

pub use value_objects::{FlagRequirements, GuidePlan, MissingRequirements};
