//! Value objects - immutable data derived from aggregates

mod guide_plan;
mod requirements;

pub use guide_plan::GuidePlan;
pub use requirements::{FlagRequirements, MissingRequirements};
