//! Template storage.

mod memory;

pub use memory::InMemoryStore;
