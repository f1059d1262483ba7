//! Save game storage adapters.

mod in_memory;
mod sqlite;

pub use in_memory::InMemorySaveRepo;
pub use sqlite::SqliteSaveRepo;
