//! Durable side of the notes: the whole collection lives as one JSON array
//! under a single storage key.

use crate::{BackendError, Note, Result, StorageBackend};
use log::{debug, warn};
use std::collections::HashSet;

pub const DEFAULT_STORAGE_KEY: &str = "savedNotes";

pub struct NoteStore {
    backend: Box<dyn StorageBackend>,
    key: String,
}

impl NoteStore {
    pub fn new(backend: Box<dyn StorageBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the stored collection.
    ///
    /// Never fails: a missing key, a backend read error or a blob that does not
    /// parse as a list of notes all yield an empty collection.
    #[must_use]
    pub fn load(&self) -> Vec<Note> {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No notes stored under '{}'", self.key);
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed reading notes, starting empty: {e}");
                return Vec::new();
            }
        };

        let notes: Vec<Note> = match serde_json::from_str(&raw) {
            Ok(notes) => notes,
            Err(e) => {
                warn!("Stored notes under '{}' are malformed, starting empty: {e}", self.key);
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        let total = notes.len();
        let unique: Vec<Note> = notes.into_iter().filter(|n| seen.insert(n.id)).collect();
        if unique.len() != total {
            warn!(
                "Dropped {} stored notes with duplicate IDs",
                total - unique.len()
            );
        }

        debug!("Loaded {} notes from '{}'", unique.len(), self.key);
        unique
    }

    /// Serializes the full collection and replaces whatever is stored under the key.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Serialization` if encoding fails, or whatever the backend
    /// reports when the write is refused.
    pub fn save_all(&self, notes: &[Note]) -> Result<()> {
        let raw = serde_json::to_string(notes).map_err(BackendError::Serialization)?;
        self.backend.set(&self.key, &raw)?;
        debug!("Wrote {} notes to '{}'", notes.len(), self.key);
        Ok(())
    }

    /// Removes the key entirely.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the removal fails.
    pub fn clear(&self) -> Result<()> {
        self.backend.remove(&self.key)?;
        debug!("Removed '{}'", self.key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::MemoryBackend;

    fn store() -> (NoteStore, MemoryBackend) {
        let backend = MemoryBackend::new();
        (
            NoteStore::new(Box::new(backend.clone()), DEFAULT_STORAGE_KEY),
            backend,
        )
    }

    fn note(id: i64, content: &str, color: Option<&str>) -> Note {
        Note {
            id,
            content: content.to_string(),
            color: color.map(str::to_string),
        }
    }

    #[test]
    fn empty_storage_loads_empty() {
        let (store, _) = store();
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_all_then_load_returns_same_collection() {
        let (store, _) = store();
        let notes = vec![
            note(10, "<p>a</p>", Some("#ffffff")),
            note(11, "<p>b</p>", None),
            note(12, "", Some("#d7aefb")),
        ];
        store.save_all(&notes).unwrap();
        assert_eq!(store.load(), notes);
    }

    #[test]
    fn colorless_notes_omit_the_color_field() {
        let (store, backend) = store();
        store.save_all(&[note(1, "x", None)]).unwrap();
        assert_eq!(
            backend.get(DEFAULT_STORAGE_KEY).unwrap().as_deref(),
            Some(r#"[{"id":1,"content":"x"}]"#)
        );
    }

    #[test]
    fn malformed_blobs_load_empty() {
        let (store, backend) = store();
        for raw in [
            "not json",
            "{}",
            r#"[{"id":"1","content":"x"}]"#,
            r#"[{"id":1}]"#,
            r#"[{"id":1.5,"content":"x"}]"#,
            "null",
        ] {
            backend.set(DEFAULT_STORAGE_KEY, raw).unwrap();
            assert!(store.load().is_empty(), "{raw} should load as empty");
        }
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let (store, backend) = store();
        backend
            .set(
                DEFAULT_STORAGE_KEY,
                r#"[{"id":1,"content":"first"},{"id":2,"content":"b"},{"id":1,"content":"again"}]"#,
            )
            .unwrap();
        let loaded = store.load();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].content, "first");
    }

    #[test]
    fn clear_removes_the_key() {
        let (store, backend) = store();
        store.save_all(&[note(1, "x", None)]).unwrap();
        store.clear().unwrap();
        assert!(backend.get(DEFAULT_STORAGE_KEY).unwrap().is_none());
        assert!(store.load().is_empty());
    }
}
