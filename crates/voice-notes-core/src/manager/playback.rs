use crate::{CoreResult, EntryId, GatewayError, LibraryError, RecordingManager, SoundHandle};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};

impl RecordingManager {
    /// Play `entry_id`, or stop it if it is the entry already playing.
    ///
    /// Whatever else is playing is stopped first. A failed stop is logged
    /// and the marker is cleared anyway, so at most one entry is ever
    /// marked as playing.
    ///
    /// # Errors
    ///
    /// [`LibraryError::UnknownEntry`] if the id is not in the library (no
    /// playback change), [`LibraryError::DeviceFailure`] if the sound could
    /// not be loaded or started (nothing marked as playing).
    #[instrument(skip(self))]
    pub async fn toggle_playback(&mut self, entry_id: EntryId) -> CoreResult<()> {
        if !self.library.contains(entry_id) {
            return Err(LibraryError::UnknownEntry {
                id: entry_id,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if let Some(current) = self.currently_playing.take() {
            if let Err(e) = self.stop_sound(current).await {
                warn!(entry_id = %current, error = ?e, "Failed to stop current playback");
            }

            if current == entry_id {
                info!(entry_id = %entry_id, "Playback toggled off");
                return Ok(());
            }
        }

        let sound = self.resolve_sound(entry_id).await?;

        self.audio
            .play(&sound)
            .await
            .map_err(|source| LibraryError::DeviceFailure {
                source,
                location: ErrorLocation::from(Location::caller()),
            })
            .inspect_err(|e| error!(entry_id = %entry_id, error = ?e, "Failed to start playback"))?;

        self.currently_playing = Some(entry_id);

        info!(entry_id = %entry_id, "Playback started");

        Ok(())
    }

    /// Stop whatever is playing.
    ///
    /// The marker is cleared before the device is asked to stop, so it is
    /// gone even when the device reports a failure.
    #[instrument(skip(self))]
    pub async fn stop_playback(&mut self) -> CoreResult<()> {
        let Some(current) = self.currently_playing.take() else {
            debug!("Nothing playing");
            return Ok(());
        };

        self.stop_sound(current)
            .await
            .map_err(|source| LibraryError::DeviceFailure {
                source,
                location: ErrorLocation::from(Location::caller()),
            })
            .inspect_err(|e| warn!(entry_id = %current, error = ?e, "Failed to stop playback"))?;

        info!(entry_id = %current, "Playback stopped");

        Ok(())
    }

    async fn stop_sound(&self, entry_id: EntryId) -> Result<(), GatewayError> {
        match self.library.find(entry_id).and_then(|e| e.sound()) {
            Some(sound) => self.audio.stop(&sound).await,
            None => {
                debug!(entry_id = %entry_id, "No loaded sound to stop");
                Ok(())
            }
        }
    }

    /// Hand a sound back to the device. Failures are logged only.
    pub(super) async fn release_sound(&self, entry_id: EntryId, sound: SoundHandle) {
        match self.audio.unload(&sound).await {
            Ok(()) => debug!(entry_id = %entry_id, "Sound unloaded"),
            Err(e) => warn!(entry_id = %entry_id, error = ?e, "Failed to unload sound"),
        }
    }

    /// Cached handle for the entry, loading it from the file reference on
    /// first use.
    async fn resolve_sound(&mut self, entry_id: EntryId) -> CoreResult<SoundHandle> {
        let entry = self
            .library
            .find(entry_id)
            .ok_or_else(|| LibraryError::UnknownEntry {
                id: entry_id,
                location: ErrorLocation::from(Location::caller()),
            })?;

        if let Some(sound) = entry.sound() {
            return Ok(sound);
        }

        let file = entry.file_reference().clone();
        let sound = self
            .audio
            .load_sound(&file)
            .await
            .map_err(|source| LibraryError::DeviceFailure {
                source,
                location: ErrorLocation::from(Location::caller()),
            })
            .inspect_err(|e| error!(entry_id = %entry_id, error = ?e, "Failed to load sound"))?;

        if let Some(entry) = self.library.find_mut(entry_id) {
            entry.set_sound(sound);
        }

        debug!(entry_id = %entry_id, file = %file, "Sound loaded");

        Ok(sound)
    }
}
