use crate::{
    AudioDevice, CoreResult, EntryId, KeyValueStore, LIBRARY_KEY, Library, LibraryError,
    RecordingEntry, SessionState, ShareTarget,
};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};

/// Owns the recording session, the ordered library and the playback marker.
///
/// All mutation goes through `&mut self` async methods, so one operation
/// runs to completion (success or reported failure) before the next one
/// can start. Gateway failures come back as [`LibraryError`] values and
/// never leave the state half-applied.
///
/// # Ownership
///
/// Entries and their sound handles are owned by the [`Library`]. The
/// playback marker refers to an entry by [`EntryId`] only.
pub struct RecordingManager {
    pub(super) audio: Arc<dyn AudioDevice>,
    pub(super) store: Arc<dyn KeyValueStore>,
    pub(super) share: Arc<dyn ShareTarget>,
    pub(super) state: SessionState,
    pub(super) library: Library,
    pub(super) currently_playing: Option<EntryId>,
    pub(super) advisory: Option<String>,
}

impl RecordingManager {
    /// Creates an idle manager with an empty library.
    ///
    /// Call [`RecordingManager::load_all`] to restore saved recordings.
    pub fn new(
        audio: Arc<dyn AudioDevice>,
        store: Arc<dyn KeyValueStore>,
        share: Arc<dyn ShareTarget>,
    ) -> Self {
        Self {
            audio,
            store,
            share,
            state: SessionState::Idle,
            library: Library::new(),
            currently_playing: None,
            advisory: None,
        }
    }

    /// Current session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Saved recordings in display order.
    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Entry whose sound is playing, if any.
    pub fn currently_playing(&self) -> Option<EntryId> {
        self.currently_playing
    }

    /// Last user-facing advisory (e.g. missing microphone permission).
    pub fn advisory(&self) -> Option<&str> {
        self.advisory.as_deref()
    }

    /// Id of the entry shown at `index`.
    pub fn entry_id_at(&self, index: usize) -> Option<EntryId> {
        self.library.get(index).map(RecordingEntry::id)
    }

    /// Restore the library from the key-value store.
    ///
    /// A missing, unreadable or undecodable snapshot yields an empty
    /// library; none of these are errors. Sounds loaded for the previous
    /// library are released. Returns the number of entries loaded.
    #[instrument(skip(self))]
    pub async fn load_all(&mut self) -> usize {
        if self.currently_playing.is_some() {
            if let Err(e) = self.stop_playback().await {
                warn!(error = ?e, "Failed to stop playback before reload");
            }
        }

        for entry in self.library.iter() {
            if let Some(sound) = entry.sound() {
                self.release_sound(entry.id(), sound).await;
            }
        }

        self.library = match self.store.get(LIBRARY_KEY).await {
            Ok(Some(snapshot)) => match Library::from_snapshot(&snapshot) {
                Ok(library) => library,
                Err(e) => {
                    warn!(error = ?e, "Saved library is unreadable, starting empty");
                    Library::new()
                }
            },
            Ok(None) => {
                info!("No saved library found");
                Library::new()
            }
            Err(e) => {
                warn!(error = ?e, "Failed to read saved library, starting empty");
                Library::new()
            }
        };

        info!(entries = self.library.len(), "Library loaded");

        self.library.len()
    }

    /// Serialized snapshot of the current library.
    pub fn snapshot(&self) -> CoreResult<String> {
        self.library.snapshot()
    }

    /// Append `entry` and persist.
    ///
    /// A persistence failure is returned but the in-memory append stands.
    #[instrument(skip(self, entry), fields(entry_id = %entry.id()))]
    pub(crate) async fn append(&mut self, entry: RecordingEntry) -> CoreResult<()> {
        self.library.append(entry)?;

        info!(position = self.library.len(), "Recording saved");

        self.persist().await
    }

    pub(super) async fn persist(&self) -> CoreResult<()> {
        let snapshot = self.library.snapshot()?;

        self.store
            .set(LIBRARY_KEY, snapshot)
            .await
            .map_err(|source| LibraryError::PersistenceFailure {
                source,
                location: ErrorLocation::from(Location::caller()),
            })
            .inspect_err(|e| error!(error = ?e, "Failed to persist library"))?;

        debug!(entries = self.library.len(), "Library persisted");

        Ok(())
    }
}
