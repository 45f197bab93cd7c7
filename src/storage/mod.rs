//! Key-value persistence for ingredients, the cached query and favorites
//!
//! Every durable record in the application is a JSON document stored under its
//! own key. The `KeyValueStore` trait is the only thing the rest of the crate
//! knows about persistence, so the on-disk `FileStore` and the process-local
//! `MemoryStore` are interchangeable.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;

/// Key under which the current ingredient list is stored
pub const INGREDIENTS_KEY: &str = "ingredients";

/// Key under which the most recent (ingredients, response) pair is stored
pub const LAST_QUERY_KEY: &str = "last_query";

/// Key under which the favorites list is stored
pub const FAVORITES_KEY: &str = "favorites";

/// Errors raised by a key-value store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying storage could not be read or written
    #[error("Storage unavailable: {0}")]
    Unavailable(#[from] std::io::Error),

    /// A stored value could not be encoded or decoded
    #[error("Failed to encode or decode stored value: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// A string-keyed, string-valued store
///
/// Reads and writes of a single key are atomic: a reader sees either the old
/// value or the new one, never a partial write.
pub trait KeyValueStore: Debug + Send + Sync {
    /// Returns the value stored under `key`, or `None` if nothing was stored
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Store handle shared between every component that persists state
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Reads and decodes a JSON record
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encodes and writes a JSON record
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(value)?;
    store.put(key, &json)
}
