use crate::{CoreResult, EntryId, LibraryError, RecordingManager};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{info, instrument, warn};

impl RecordingManager {
    /// Delete the entry at `index` and persist.
    ///
    /// If that entry is playing, playback is stopped and the marker cleared
    /// first. Its loaded sound is released.
    ///
    /// # Errors
    ///
    /// [`LibraryError::IndexOutOfRange`] for `index >= len`, leaving the
    /// library untouched. [`LibraryError::PersistenceFailure`] if the
    /// snapshot could not be written; the removal still stands.
    #[instrument(skip(self))]
    pub async fn remove_at(&mut self, index: usize) -> CoreResult<()> {
        let Some(entry_id) = self.entry_id_at(index) else {
            warn!(index, len = self.library.len(), "Delete rejected, index out of range");
            return Err(LibraryError::IndexOutOfRange {
                index,
                len: self.library.len(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        if self.currently_playing == Some(entry_id) {
            if let Err(e) = self.stop_playback().await {
                warn!(entry_id = %entry_id, error = ?e, "Failed to stop playback before delete");
            }
        }

        let removed = self.library.remove_at(index)?;

        if let Some(sound) = removed.sound() {
            self.release_sound(entry_id, sound).await;
        }

        info!(entry_id = %entry_id, index, "Recording deleted");

        self.persist().await
    }

    /// Offer the entry's file to the share target.
    ///
    /// Sharing is fire-and-forget: a failure is logged, not returned.
    ///
    /// # Errors
    ///
    /// [`LibraryError::UnknownEntry`] if the id is not in the library.
    #[instrument(skip(self))]
    pub async fn share(&self, entry_id: EntryId) -> CoreResult<()> {
        let entry = self
            .library
            .find(entry_id)
            .ok_or_else(|| LibraryError::UnknownEntry {
                id: entry_id,
                location: ErrorLocation::from(Location::caller()),
            })?;

        match self.share.share(entry.file_reference()).await {
            Ok(()) => info!(entry_id = %entry_id, "Recording shared"),
            Err(e) => warn!(entry_id = %entry_id, error = ?e, "Failed to share recording"),
        }

        Ok(())
    }
}
