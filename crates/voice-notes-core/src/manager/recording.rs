use crate::{
    CaptureHandle, CoreResult, LibraryError, Permission, RecordingEntry, RecordingManager,
    SessionState, format_duration,
};

use std::{panic::Location, time::Instant};

use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

const PERMISSION_ADVISORY: &str = "Please grant permission to the app to access the microphone";

impl RecordingManager {
    /// Start a recording session.
    ///
    /// Does nothing unless the session is idle. On any failure the session
    /// returns to idle; a permission refusal also sets the advisory.
    #[instrument(skip(self))]
    pub async fn start_recording(&mut self) -> CoreResult<()> {
        if !self.state.is_idle() {
            debug!(state = ?self.state, "Start ignored, session not idle");
            return Ok(());
        }

        self.state = SessionState::Requesting;

        match self.begin_capture().await {
            Ok(capture) => {
                let session_id = Uuid::new_v4();
                self.state = SessionState::Recording {
                    capture,
                    started_at: Instant::now(),
                    session_id,
                };
                self.advisory = None;

                info!(session_id = %session_id, "Recording started");

                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Idle;

                if matches!(e, LibraryError::PermissionDenied { .. }) {
                    self.advisory = Some(PERMISSION_ADVISORY.to_string());
                    warn!("Microphone permission denied");
                } else {
                    error!(error = ?e, "Failed to start recording");
                }

                Err(e)
            }
        }
    }

    /// Stop the active recording and save it to the library.
    ///
    /// The session is idle again before finalization begins. If the capture
    /// cannot be turned into a playable entry it is discarded.
    #[instrument(skip(self))]
    pub async fn stop_recording(&mut self) -> CoreResult<()> {
        let SessionState::Recording {
            capture,
            started_at,
            session_id,
        } = self.state
        else {
            debug!(state = ?self.state, "Stop ignored, not recording");
            return Ok(());
        };

        self.state = SessionState::Idle;

        info!(
            session_id = %session_id,
            elapsed_ms = started_at.elapsed().as_millis(),
            "Recording stopped"
        );

        let finished = self
            .audio
            .stop_capture(capture)
            .await
            .map_err(|source| LibraryError::DeviceFailure {
                source,
                location: ErrorLocation::from(Location::caller()),
            })
            .inspect_err(|e| {
                error!(session_id = %session_id, error = ?e, "Failed to stop capture, recording discarded")
            })?;

        let sound = self
            .audio
            .load_sound(&finished.file_reference)
            .await
            .map_err(|source| LibraryError::FinalizationFailure {
                source,
                location: ErrorLocation::from(Location::caller()),
            })
            .inspect_err(|e| {
                error!(session_id = %session_id, error = ?e, "Failed to load recording, recording discarded")
            })?;

        debug!(
            session_id = %session_id,
            duration_ms = finished.duration_millis,
            file = %finished.file_reference,
            "Capture finalized"
        );

        let entry = RecordingEntry::new(
            format_duration(finished.duration_millis),
            finished.file_reference,
            Some(sound),
        );

        self.append(entry).await
    }

    /// Start when idle, stop when recording.
    pub async fn toggle_recording(&mut self) -> CoreResult<()> {
        if self.state.is_recording() {
            self.stop_recording().await
        } else {
            self.start_recording().await
        }
    }

    async fn begin_capture(&self) -> CoreResult<CaptureHandle> {
        let permission = self
            .audio
            .request_permission()
            .await
            .map_err(|source| LibraryError::DeviceFailure {
                source,
                location: ErrorLocation::from(Location::caller()),
            })?;

        if permission == Permission::Denied {
            return Err(LibraryError::PermissionDenied {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.audio
            .configure_for_capture()
            .await
            .map_err(|source| LibraryError::DeviceFailure {
                source,
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.audio
            .start_capture()
            .await
            .map_err(|source| LibraryError::DeviceFailure {
                source,
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
