use crate::{CoreResult, EntryId, LibraryError, RecordingEntry};

use std::{collections::HashSet, panic::Location};

use error_location::ErrorLocation;
use tracing::warn;

/// Key under which the serialized library is stored.
pub const LIBRARY_KEY: &str = "recordings";

/// Ordered collection of saved recordings.
///
/// Insertion order is display order. Ids are unique.
#[derive(Debug, Clone, Default)]
pub struct Library {
    entries: Vec<RecordingEntry>,
}

impl Library {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a library from a snapshot produced by [`Library::snapshot`].
    ///
    /// Later duplicates of an id are dropped.
    #[track_caller]
    pub fn from_snapshot(snapshot: &str) -> CoreResult<Self> {
        let decoded: Vec<RecordingEntry> =
            serde_json::from_str(snapshot).map_err(|e| LibraryError::Serialization {
                reason: format!("Failed to decode library: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let mut seen = HashSet::with_capacity(decoded.len());
        let mut entries = Vec::with_capacity(decoded.len());
        for entry in decoded {
            if seen.insert(entry.id()) {
                entries.push(entry);
            } else {
                warn!(entry_id = %entry.id(), "Dropping duplicate recording from snapshot");
            }
        }

        Ok(Self { entries })
    }

    /// Serialize the persisted fields of every entry, in order.
    #[track_caller]
    pub fn snapshot(&self) -> CoreResult<String> {
        serde_json::to_string(&self.entries).map_err(|e| LibraryError::Serialization {
            reason: format!("Failed to encode library: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Add `entry` at the end.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::DuplicateEntry`] if the id is already present.
    #[track_caller]
    pub fn append(&mut self, entry: RecordingEntry) -> CoreResult<()> {
        if self.contains(entry.id()) {
            return Err(LibraryError::DuplicateEntry {
                id: entry.id(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.entries.push(entry);
        Ok(())
    }

    /// Remove and return the entry at `index`, shifting later entries left.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::IndexOutOfRange`] without mutating when
    /// `index >= len`.
    #[track_caller]
    pub fn remove_at(&mut self, index: usize) -> CoreResult<RecordingEntry> {
        if index >= self.entries.len() {
            return Err(LibraryError::IndexOutOfRange {
                index,
                len: self.entries.len(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(self.entries.remove(index))
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&RecordingEntry> {
        self.entries.get(index)
    }

    /// Entry with `id`.
    pub fn find(&self, id: EntryId) -> Option<&RecordingEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub(crate) fn find_mut(&mut self, id: EntryId) -> Option<&mut RecordingEntry> {
        self.entries.iter_mut().find(|e| e.id() == id)
    }

    /// Whether an entry with `id` exists.
    pub fn contains(&self, id: EntryId) -> bool {
        self.find(id).is_some()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the library has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = &RecordingEntry> {
        self.entries.iter()
    }
}
