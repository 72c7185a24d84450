use crate::gateway::{FileReference, SoundHandle};

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a saved recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Generate a new random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for EntryId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One saved clip.
///
/// Only `id`, `duration_formatted` and `file_reference` are persisted. The
/// sound handle is resolved lazily from the file reference and cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingEntry {
    id: EntryId,
    duration_formatted: String,
    file_reference: FileReference,
    #[serde(skip)]
    sound: Option<SoundHandle>,
}

impl RecordingEntry {
    /// Create an entry with a fresh id.
    pub fn new(
        duration_formatted: impl Into<String>,
        file_reference: FileReference,
        sound: Option<SoundHandle>,
    ) -> Self {
        Self::with_id(EntryId::new(), duration_formatted, file_reference, sound)
    }

    /// Create an entry with a caller-chosen id.
    pub fn with_id(
        id: EntryId,
        duration_formatted: impl Into<String>,
        file_reference: FileReference,
        sound: Option<SoundHandle>,
    ) -> Self {
        Self {
            id,
            duration_formatted: duration_formatted.into(),
            file_reference,
            sound,
        }
    }

    /// Entry id.
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Duration as `m:ss`.
    pub fn duration_formatted(&self) -> &str {
        &self.duration_formatted
    }

    /// Where the audio lives.
    pub fn file_reference(&self) -> &FileReference {
        &self.file_reference
    }

    /// Cached playable handle, if one has been resolved.
    pub fn sound(&self) -> Option<SoundHandle> {
        self.sound
    }

    pub(crate) fn set_sound(&mut self, sound: SoundHandle) {
        self.sound = Some(sound);
    }
}
