//! Entity modules - Domain capability encapsulation.
//!
//! Each module wraps operations for a domain entity type.
//! They depend on stores and the scenario catalog and provide the building
//! blocks for use cases.

pub mod profile;
pub mod progress;
pub mod scenario;

pub use profile::ProfileStore;
pub use progress::{AppliedChoice, ProgressError, ProgressStore};
pub use scenario::ScenarioCatalog;
