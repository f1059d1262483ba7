//! # Branchline Domain Types
//!
//! Shared vocabulary types used by the aggregates and by the engine.
//!
//! ## Design Principles
//!
//! 1. **Pure data types** - No I/O, no async, no side effects
//! 2. **Serializable** - All types derive Serialize/Deserialize

mod ending;
pub use ending::EndingKind;
