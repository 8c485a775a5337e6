//! Storage Module
//!
//! The durable, synchronous key-value medium the cache persists its
//! collections into. Each collection is one serialized blob under a fixed key.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;

// == Key-Value Store ==
/// String-keyed blob storage used by the cache stores.
///
/// Implementations must be fast and local; every cache operation performs a
/// full read-modify-write of one blob through this trait.
pub trait KeyValueStore: Send + Sync {
    /// Returns the blob stored under `key`, or `None` if it was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any prior value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes the blob stored under `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
