//! Local persistence.
//!
//! Everything the game keeps between runs goes through a [`KeyValueStore`]:
//! one JSON document per key. The file-backed adapter is used by the app, the
//! in-memory adapter by tests.

pub mod adapters;
pub mod obfuscation;
pub mod repository;
pub mod store;

pub use adapters::FileStore;
#[cfg(test)]
pub use adapters::InMemoryStore;
pub use store::{KeyValueStore, StoreError, StoreRef};
