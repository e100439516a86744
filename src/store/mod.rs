//! StudyStore - the persisted collection of study sets and the active-set pointer.
//!
//! The whole collection lives as one JSON array under a single key and is
//! rewritten on every mutation. A second key holds the id of the active set.
//!
//! ## Example
//!
//! ```ignore
//! use study_store::{InMemoryKeyValueStore, StudySet, StudyStore};
//!
//! let store = StudyStore::new(InMemoryKeyValueStore::new());
//! store.subscribe(|| println!("library changed"));
//!
//! store.add(StudySet::new("1", "Basics", "German", chrono::Utc::now()))?;
//! assert_eq!(store.get_active().unwrap().title, "Basics");
//! ```

mod backup;
mod collection;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::kv::KeyValueStore;
use crate::model::{StudySet, VocabularyItem};
use crate::notify::{ChangeNotifier, SubscriptionId};

use collection::Collection;

pub use backup::ImportSummary;

/// Ordering for [`StudyStore::list_ordered`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetOrder {
    /// Storage order (insertion order).
    #[default]
    Inserted,
    /// Most recently created first.
    NewestFirst,
    /// Most recently studied first; never-studied sets last, newest first among them.
    RecentlyUsed,
}

/// Owns the study-set collection and active pointer inside a [`KeyValueStore`].
///
/// Reads never fail: unreadable or corrupt storage reads as an empty
/// collection. Writes return a [`StoreError`] describing why they did not
/// land, after logging it. Nothing is rolled back when a later write in the
/// same operation fails.
pub struct StudyStore<K> {
    kv: K,
    config: StoreConfig,
    notifier: ChangeNotifier,
}

impl<K: KeyValueStore> StudyStore<K> {
    /// Store with the default key layout.
    pub fn new(kv: K) -> Self {
        Self::with_config(kv, StoreConfig::default())
    }

    pub fn with_config(kv: K, config: StoreConfig) -> Self {
        Self {
            kv,
            config,
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The backing key-value store.
    pub fn backend(&self) -> &K {
        &self.kv
    }

    /// The notifier fired after every mutation. Clone it to hand to other components.
    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// Shorthand for `self.notifier().subscribe(listener)`.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Every study set in storage order.
    ///
    /// Empty if storage is empty, unreadable or not a JSON array. Records that
    /// do not decode as a [`StudySet`] are left out here but kept in storage.
    pub fn list(&self) -> Vec<StudySet> {
        self.load().into_sets()
    }

    fn load(&self) -> Collection {
        let raw = match self.kv.get_item(&self.config.collection_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Collection::default(),
            Err(err) => {
                warn!(key = %self.config.collection_key, error = %err, "study sets unreadable, treating as empty");
                return Collection::default();
            }
        };

        match Collection::parse(&raw) {
            Ok(collection) => collection,
            Err(err) => {
                warn!(key = %self.config.collection_key, error = %err, "study sets corrupt, treating as empty");
                Collection::default()
            }
        }
    }

    /// Every study set, sorted for display.
    pub fn list_ordered(&self, order: SetOrder) -> Vec<StudySet> {
        let mut sets = self.list();
        match order {
            SetOrder::Inserted => {}
            SetOrder::NewestFirst => sets.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SetOrder::RecentlyUsed => sets.sort_by(|a, b| {
                b.last_used
                    .cmp(&a.last_used)
                    .then_with(|| b.created_at.cmp(&a.created_at))
            }),
        }
        sets
    }

    /// First study set with the given id.
    pub fn get(&self, id: &str) -> Option<StudySet> {
        self.list().into_iter().find(|set| set.id == id)
    }

    /// The stored pointer as written, which may name a set that no longer exists.
    ///
    /// Accepts both a plain id and a JSON-quoted one.
    pub fn active_id(&self) -> Option<String> {
        let raw = match self.kv.get_item(&self.config.active_key) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(key = %self.config.active_key, error = %err, "active set pointer unreadable");
                return None;
            }
        };
        let id = serde_json::from_str::<String>(&raw).unwrap_or(raw);
        if id.is_empty() {
            None
        } else {
            Some(id)
        }
    }

    /// The set named by the pointer, else the first set, else None.
    ///
    /// Resolved against the current collection on every call.
    pub fn get_active(&self) -> Option<StudySet> {
        let sets = self.list();
        let active = self.active_id();
        let index = active
            .as_deref()
            .and_then(|id| sets.iter().position(|set| set.id == id))
            .unwrap_or(0);
        sets.into_iter().nth(index)
    }

    /// Append `set` and make it active.
    ///
    /// Ids are not checked for uniqueness. With a duplicate id, lookups match
    /// the earlier entry.
    pub fn add(&self, set: StudySet) -> Result<(), StoreError> {
        let id = set.id.clone();
        let mut sets = self.load();
        sets.push(set);

        self.write_sets(&sets)?;
        let pointer = self.write_active(Some(&id));
        self.notifier.notify();
        debug!(id = %id, total = sets.len(), "study set added");
        pointer
    }

    /// Replace the set with the same id. Returns false, writing nothing, if no such set exists.
    ///
    /// The stored `created_at` is kept.
    pub fn update(&self, set: StudySet) -> Result<bool, StoreError> {
        let id = set.id.clone();
        self.modify(&id, move |existing| {
            *existing = set;
            true
        })
    }

    /// Apply `change` to the first set with id `id` and persist it.
    ///
    /// `change` returns whether it changed anything; when it returns false
    /// nothing is written. `id` and `created_at` are restored afterwards.
    pub fn modify<F>(&self, id: &str, change: F) -> Result<bool, StoreError>
    where
        F: FnOnce(&mut StudySet) -> bool,
    {
        let mut sets = self.load();
        let Some(existing) = sets.find_mut(id) else {
            debug!(id = %id, "no study set to modify");
            return Ok(false);
        };

        let created_at = existing.created_at;
        if !change(&mut *existing) {
            return Ok(false);
        }
        existing.id = id.to_string();
        existing.created_at = created_at;

        self.write_sets(&sets)?;
        self.notifier.notify();
        debug!(id = %id, "study set updated");
        Ok(true)
    }

    /// Remove the first set with id `id`. Returns false if there was none.
    ///
    /// If it was the active set, the pointer moves to the new first set, or is
    /// cleared when nothing is left.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut sets = self.load();
        if sets.remove(id).is_none() {
            return Ok(false);
        }

        self.write_sets(&sets)?;
        let pointer = if self.active_id().as_deref() == Some(id) {
            self.write_active(sets.first_id())
        } else {
            Ok(())
        };
        self.notifier.notify();
        debug!(id = %id, remaining = sets.len(), "study set deleted");
        pointer.map(|()| true)
    }

    /// Point at `id` without checking it exists; [`get_active`](Self::get_active) falls back if it doesn't.
    pub fn set_active(&self, id: &str) -> Result<(), StoreError> {
        self.write_active(Some(id))?;
        self.notifier.notify();
        debug!(id = %id, "active study set changed");
        Ok(())
    }

    /// Record that a set was opened for study at `at`.
    pub fn touch(&self, id: &str, at: DateTime<Utc>) -> Result<bool, StoreError> {
        self.modify(id, |set| {
            set.last_used = Some(at);
            true
        })
    }

    /// Append a word to a set's vocabulary unless the set already has it.
    ///
    /// Returns false when the set is missing or the word is already present.
    pub fn add_vocabulary(&self, set_id: &str, item: VocabularyItem) -> Result<bool, StoreError> {
        self.modify(set_id, |set| {
            if set.find_word(&item.word).is_some() {
                debug!(set = %set_id, word = %item.word, "word already in vocabulary");
                return false;
            }
            set.vocabulary.push(item);
            true
        })
    }

    /// Remove both keys.
    pub fn clear(&self) -> Result<(), StoreError> {
        let sets = self.kv.remove_item(&self.config.collection_key);
        let pointer = self.kv.remove_item(&self.config.active_key);
        if sets.is_ok() || pointer.is_ok() {
            self.notifier.notify();
        }
        sets.and(pointer).map_err(|err| {
            warn!(error = %err, "failed to clear study sets");
            err
        })
    }

    fn write_sets(&self, sets: &Collection) -> Result<(), StoreError> {
        let key = &self.config.collection_key;
        let json = sets.to_json().map_err(|e| {
            let err = StoreError::from(e);
            warn!(key = %key, error = %err, "failed to serialize study sets");
            err
        })?;
        self.kv.set_item(key, &json).map_err(|err| {
            warn!(key = %key, error = %err, "failed to persist study sets");
            err
        })
    }

    fn write_active(&self, id: Option<&str>) -> Result<(), StoreError> {
        let key = &self.config.active_key;
        let result = match id {
            Some(id) => self.kv.set_item(key, id),
            None => self.kv.remove_item(key),
        };
        result.map_err(|err| {
            warn!(key = %key, error = %err, "failed to persist active study set");
            err
        })
    }
}
