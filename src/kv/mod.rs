//! Key-value storage backends.
//!
//! The study store keeps its whole state in two string values. Anything that
//! can get, set and remove a string by key can back it: the browser's local
//! storage, a directory of files, or a map in memory for tests.

mod file;
mod in_memory;

use crate::error::StoreError;

/// String key-value storage with whole-value reads and writes.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`. Returns None if the key is absent.
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key succeeds.
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

impl<K: KeyValueStore + ?Sized> KeyValueStore for &K {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove_item(key)
    }
}

pub use file::FileKeyValueStore;
pub use in_memory::InMemoryKeyValueStore;
