//! Aggregate roots - domain objects that own their related data
//!
//! Each aggregate:
//! - Owns all its constituent parts (enforced by Rust ownership)
//! - Exposes behavior through methods, not public fields
//!
//! `SceneGraph` and `Scene` are read-only after load. `ScenarioProgress`
//! and `PlayerProfile` are the only state that changes during play, and
//! both live inside the persisted `SaveGame`.

pub mod profile;
pub mod progress;
pub mod save_game;
pub mod scene;
pub mod scene_graph;

pub use profile::PlayerProfile;
pub use progress::ScenarioProgress;
pub use save_game::SaveGame;
pub use scene::{Choice, ChoiceTarget, ImageRef, Scene};
pub use scene_graph::SceneGraph;
