//! The stored collection, decoded one record at a time.
//!
//! A record that is valid JSON but not a valid [`StudySet`] is kept as its raw
//! value and written back unchanged, so a single odd record never costs the
//! rest of the library.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::model::StudySet;

enum Entry {
    Set(StudySet),
    Raw(Value),
}

#[derive(Default)]
pub(crate) struct Collection {
    entries: Vec<Entry>,
}

impl Collection {
    /// Decode a stored document. Fails only if it is not a JSON array.
    pub(crate) fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        let values: Vec<Value> = serde_json::from_str(raw)?;
        let entries = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| match StudySet::deserialize(&value) {
                Ok(set) => Entry::Set(set),
                Err(err) => {
                    warn!(index, error = %err, "skipping undecodable study set, keeping it as stored");
                    Entry::Raw(value)
                }
            })
            .collect();
        Ok(Self { entries })
    }

    pub(crate) fn sets(&self) -> impl Iterator<Item = &StudySet> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Set(set) => Some(set),
            Entry::Raw(_) => None,
        })
    }

    pub(crate) fn into_sets(self) -> Vec<StudySet> {
        self.entries
            .into_iter()
            .filter_map(|entry| match entry {
                Entry::Set(set) => Some(set),
                Entry::Raw(_) => None,
            })
            .collect()
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.sets().any(|set| set.id == id)
    }

    pub(crate) fn first_id(&self) -> Option<&str> {
        self.sets().next().map(|set| set.id.as_str())
    }

    pub(crate) fn find_mut(&mut self, id: &str) -> Option<&mut StudySet> {
        self.entries.iter_mut().find_map(|entry| match entry {
            Entry::Set(set) if set.id == id => Some(set),
            _ => None,
        })
    }

    /// Remove the first decoded set with id `id`.
    pub(crate) fn remove(&mut self, id: &str) -> Option<StudySet> {
        let index = self
            .entries
            .iter()
            .position(|entry| matches!(entry, Entry::Set(set) if set.id == id))?;
        match self.entries.remove(index) {
            Entry::Set(set) => Some(set),
            Entry::Raw(_) => None,
        }
    }

    pub(crate) fn push(&mut self, set: StudySet) {
        self.entries.push(Entry::Set(set));
    }

    /// Number of decoded sets; raw records are not counted.
    pub(crate) fn len(&self) -> usize {
        self.sets().count()
    }

    pub(crate) fn to_json(&self) -> Result<String, serde_json::Error> {
        let values = self
            .entries
            .iter()
            .map(|entry| match entry {
                Entry::Set(set) => serde_json::to_value(set),
                Entry::Raw(value) => Ok(value.clone()),
            })
            .collect::<Result<Vec<_>, _>>()?;
        serde_json::to_string(&values)
    }
}
