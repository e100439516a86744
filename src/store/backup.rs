//! Backup export and merge-on-import.

use tracing::{debug, warn};

use super::StudyStore;
use crate::error::StoreError;
use crate::kv::KeyValueStore;
use crate::model::StudySet;

/// What [`StudyStore::import_backup`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Sets whose id was new and were appended.
    pub added: usize,
    /// Sets whose id already existed and replaced the stored entry.
    pub replaced: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.added + self.replaced
    }
}

impl<K: KeyValueStore> StudyStore<K> {
    /// The whole collection as a pretty-printed JSON array.
    pub fn export_backup(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(&self.list()).map_err(StoreError::from)
    }

    /// Merge a backup produced by [`export_backup`](Self::export_backup).
    ///
    /// Sets with a known id replace the stored entry in place, keeping its
    /// `created_at`; the rest are appended in backup order. The first imported
    /// set becomes active only if no existing set was active. Malformed input
    /// is rejected before anything is written.
    pub fn import_backup(&self, json: &str) -> Result<ImportSummary, StoreError> {
        let incoming: Vec<StudySet> = serde_json::from_str(json).map_err(|e| {
            let err = StoreError::from(e);
            warn!(error = %err, "rejected study set backup");
            err
        })?;

        let mut summary = ImportSummary::default();
        let Some(first_id) = incoming.first().map(|set| set.id.clone()) else {
            return Ok(summary);
        };

        let mut sets = self.load();
        let had_active = self
            .active_id()
            .map(|id| sets.contains(&id))
            .unwrap_or(false);

        for set in incoming {
            match sets.find_mut(&set.id) {
                Some(existing) => {
                    let created_at = existing.created_at;
                    *existing = set;
                    existing.created_at = created_at;
                    summary.replaced += 1;
                }
                None => {
                    sets.push(set);
                    summary.added += 1;
                }
            }
        }

        self.write_sets(&sets)?;
        let pointer = if had_active {
            Ok(())
        } else {
            self.write_active(Some(&first_id))
        };
        self.notifier.notify();
        debug!(
            added = summary.added,
            replaced = summary.replaced,
            "study set backup imported"
        );
        pointer.map(|()| summary)
    }
}
