//! In-memory state storage modules.
//!
//! Stores manage runtime state the use cases share:
//! - `SaveStateStore` - The loaded save game, persisted on every change
//! - `SessionStore` - Guide, override and current-scenario state (never persisted)

pub mod save_state;
pub mod session;

// Re-export store types
pub use save_state::SaveStateStore;
pub use session::{GuideState, SessionStore};
