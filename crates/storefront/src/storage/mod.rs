//! Durable key-value storage for shopper state.
//!
//! The cart and the local order history are persisted as plain JSON documents
//! under fixed keys:
//!
//! - `clothingdrop-cart` - JSON array of cart line items
//! - `clothingdrop-orders` - JSON array of orders, newest first
//!
//! Two backends are provided:
//!
//! - [`MemoryStore`] - process-local map, used in tests and ephemeral sessions
//! - [`FileStore`] - one `<key>.json` file per key in a data directory
//!
//! Callers treat a missing or unreadable document as an empty collection and
//! a failed write as a logged, non-fatal event.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage key for the persisted cart.
pub const CART_KEY: &str = "clothingdrop-cart";

/// Storage key for the persisted order history.
pub const ORDERS_KEY: &str = "clothingdrop-orders";

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document could not be encoded or decoded.
    #[error("malformed stored document: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The key contains characters the backend cannot store.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// A previous writer panicked while holding the store lock.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A string-keyed document store.
pub trait KeyValueStore: Send + Sync {
    /// Read the document stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the document stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the document stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and decode a JSON document.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the document is not valid JSON for `T`,
/// or any backend error from [`KeyValueStore::get`].
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    store
        .get(key)?
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(StorageError::from)
}

/// Encode and write a JSON document.
///
/// # Errors
///
/// Returns `StorageError` if encoding or the backend write fails.
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_read_json_missing_key() {
        let store = MemoryStore::new();
        let value: Option<Vec<u32>> = read_json(&store, "absent").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_read_json_malformed() {
        let store = MemoryStore::new();
        store.set("broken", "{not json").unwrap();
        let result: Result<Option<Vec<u32>>, _> = read_json(&store, "broken");
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_write_then_read_json() {
        let store = MemoryStore::new();
        write_json(&store, "numbers", &[1, 2, 3]).unwrap();
        let value: Option<Vec<u32>> = read_json(&store, "numbers").unwrap();
        assert_eq!(value, Some(vec![1, 2, 3]));
    }
}
