//! Choice use cases.

mod availability;
mod back;
mod select;

pub use availability::{is_choice_available, ChoiceAvailability};
pub use back::GoBack;
pub(crate) use select::ensure_running;
pub use select::{ChoiceError, ChoiceOutcome, ChoiceResult, SelectChoice};

use std::sync::Arc;

/// Container for choice use cases.
pub struct ChoiceUseCases {
    pub availability: Arc<ChoiceAvailability>,
    pub select: Arc<SelectChoice>,
    pub back: Arc<GoBack>,
}

impl ChoiceUseCases {
    pub fn new(
        availability: Arc<ChoiceAvailability>,
        select: Arc<SelectChoice>,
        back: Arc<GoBack>,
    ) -> Self {
        Self {
            availability,
            select,
            back,
        }
    }
}
