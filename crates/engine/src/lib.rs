//! Branchline engine library.
//!
//! Progression engine for branching-narrative scenarios.
//!
//! ## Structure
//!
//! - `entities/` - Scenario catalog, progress and profile wrappers
//! - `stores/` - Save state and per-session runtime state
//! - `use_cases/` - Player story orchestration across entities
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `app` - Application composition

pub mod app;
pub mod entities;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

/// End-to-end play throughs on the composed `App`.
#[cfg(test)]
mod e2e_tests;

pub use app::{App, AppPorts};
