//! Persistent study sets for a language-learning app.
//!
//! A [`StudyStore`] keeps every [`StudySet`] as one JSON document inside a
//! pluggable [`KeyValueStore`], together with a pointer to the set currently
//! in focus. Listeners registered on its [`ChangeNotifier`] are told after
//! each mutation and re-query the store themselves.

mod config;
mod error;
mod kv;
mod model;
mod notify;
mod store;

pub use config::{StoreConfig, DEFAULT_ACTIVE_KEY, DEFAULT_COLLECTION_KEY};
pub use error::{ConfigError, StoreError};
pub use kv::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};
pub use model::{
    Exercises, FillInBlank, Flashcard, GrammarLesson, MultipleChoice, ReadingContent, StudySet,
    VocabularyItem,
};
pub use notify::{ChangeNotifier, SubscriptionId, CHANGE_EVENT};
pub use store::{ImportSummary, SetOrder, StudyStore};

// Re-export the EventEmitter from the event_emitter_rs crate
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
