//! InMemoryKeyValueStore - HashMap-backed storage for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::KeyValueStore;
use crate::error::StoreError;

/// In-memory key-value store backed by a HashMap.
///
/// Clone-friendly via Arc: clones share the same map. An optional quota caps
/// the total size (key plus value bytes) of everything stored, the way a
/// browser caps local storage.
#[derive(Clone, Default)]
pub struct InMemoryKeyValueStore {
    storage: Arc<RwLock<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl InMemoryKeyValueStore {
    /// Create a new empty store with no size limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty store that rejects writes past `limit` bytes in total.
    pub fn with_quota(limit: usize) -> Self {
        Self {
            storage: Arc::default(),
            quota: Some(limit),
        }
    }

    /// Total bytes used by keys and values.
    pub fn used_bytes(&self) -> usize {
        self.snapshot_read(|storage| storage.iter().map(|(k, v)| k.len() + v.len()).sum())
    }

    pub fn len(&self) -> usize {
        self.snapshot_read(|storage| storage.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Accessors that cannot fail read through a poisoned lock; the map is
    /// never left half-updated because every write is a single insert or remove.
    fn snapshot_read<T>(&self, read: impl FnOnce(&HashMap<String, String>) -> T) -> T {
        match self.storage.read() {
            Ok(guard) => read(&*guard),
            Err(poisoned) => read(&*poisoned.into_inner()),
        }
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        Ok(storage.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;

        if let Some(limit) = self.quota {
            let others: usize = storage
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }

        storage.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        storage.remove(key);
        Ok(())
    }
}
