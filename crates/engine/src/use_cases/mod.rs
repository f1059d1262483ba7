//! Use cases - Player story orchestration.
//!
//! Each module contains use cases for one part of a run. Use cases
//! orchestrate across entity modules and stores, and return the events the
//! presentation layer reacts to.

pub mod choice;
pub mod ending;
pub mod guide;
pub mod session;
pub mod unlock;

pub use choice::ChoiceUseCases;
pub use ending::HandleEnding;
pub use guide::GuideUseCase;
pub use session::SessionUseCases;
pub use unlock::UnlockChoice;
