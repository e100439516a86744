//! Content owned by a study set: vocabulary, flashcards, exercises, readings and lessons.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A word and its translation, optionally with usage hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    pub word: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_sentence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grammar_tip: Option<String>,
}

impl VocabularyItem {
    pub fn new(word: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            translation: translation.into(),
            example_sentence: None,
            grammar_tip: None,
        }
    }

    pub fn with_example(mut self, sentence: impl Into<String>) -> Self {
        self.example_sentence = Some(sentence.into());
        self
    }

    pub fn with_grammar_tip(mut self, tip: impl Into<String>) -> Self {
        self.grammar_tip = Some(tip.into());
        self
    }

    /// Case-insensitive comparison of the trimmed headword.
    pub fn is_same_word(&self, word: &str) -> bool {
        self.word.trim().to_lowercase() == word.trim().to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

impl Flashcard {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

impl From<&VocabularyItem> for Flashcard {
    fn from(item: &VocabularyItem) -> Self {
        Flashcard::new(item.word.clone(), item.translation.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercises {
    #[serde(default)]
    pub fill_in_blanks: Vec<FillInBlank>,
    #[serde(default)]
    pub multiple_choice: Vec<MultipleChoice>,
}

impl Exercises {
    pub fn is_empty(&self) -> bool {
        self.fill_in_blanks.is_empty() && self.multiple_choice.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillInBlank {
    pub id: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleChoice {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub options: Vec<String>,
}

impl MultipleChoice {
    /// Whether `answer` is one of the offered options.
    pub fn is_answerable(&self) -> bool {
        self.options.iter().any(|option| option == &self.answer)
    }
}

/// A passage for the reading lounge.
///
/// Fields not modelled here are kept in `extra` so a round-trip through the
/// store never drops what another writer put there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingContent {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<Vec<VocabularyItem>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A grammar explanation with optional example sentences. Unknown fields land in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarLesson {
    pub title: String,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
