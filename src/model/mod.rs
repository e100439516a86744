//! StudySet - the unit of persisted learning content.
//!
//! A study set is serialized with camelCase field names so documents written
//! by the browser application load unchanged:
//!
//! ```ignore
//! use study_store::StudySet;
//!
//! let set: StudySet = serde_json::from_str(r#"{
//!     "id": "1",
//!     "title": "Basics",
//!     "targetLanguage": "German",
//!     "createdAt": "2024-01-01T00:00:00Z",
//!     "vocabulary": [],
//!     "flashcards": [],
//!     "exercises": { "fillInBlanks": [], "multipleChoice": [] }
//! }"#)?;
//! ```

mod content;
mod timestamp;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use content::{
    Exercises, FillInBlank, Flashcard, GrammarLesson, MultipleChoice, ReadingContent,
    VocabularyItem,
};

/// One self-contained bundle of learning content.
///
/// `id` and `created_at` are set by whoever creates the set and are never
/// changed by the store. Everything else may be replaced on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySet {
    pub id: String,
    pub title: String,
    pub target_language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_used: Option<DateTime<Utc>>,
    #[serde(default)]
    pub vocabulary: Vec<VocabularyItem>,
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
    #[serde(default)]
    pub exercises: Exercises,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_sections: Option<Vec<ReadingContent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammar_lessons: Option<Vec<GrammarLesson>>,
    /// Fields written by other tools that this crate does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StudySet {
    /// An empty set with the given identity.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        target_language: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            target_language: target_language.into(),
            difficulty: None,
            created_at,
            last_used: None,
            vocabulary: Vec::new(),
            flashcards: Vec::new(),
            exercises: Exercises::default(),
            reading_sections: None,
            grammar_lessons: None,
            extra: Map::new(),
        }
    }

    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }

    pub fn with_vocabulary(mut self, vocabulary: Vec<VocabularyItem>) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn with_flashcards(mut self, flashcards: Vec<Flashcard>) -> Self {
        self.flashcards = flashcards;
        self
    }

    /// Find a vocabulary entry by headword (case-insensitive).
    pub fn find_word(&self, word: &str) -> Option<&VocabularyItem> {
        self.vocabulary.iter().find(|item| item.is_same_word(word))
    }
}
