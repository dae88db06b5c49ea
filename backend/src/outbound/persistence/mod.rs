//! Document persistence adapters.

mod json_store;
mod memory;

pub use json_store::JsonFilePersistence;
pub use memory::InMemoryPersistence;
