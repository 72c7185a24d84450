use crate::gateway::CaptureHandle;

use std::time::Instant;

use uuid::Uuid;

/// Recording session state machine.
///
/// `Requesting` only exists while `start_recording` is awaiting the device;
/// callers outside the manager never observe it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Not recording.
    #[default]
    Idle,
    /// Waiting on the microphone permission query.
    Requesting,
    /// Currently capturing audio.
    Recording {
        /// Device handle for the active capture.
        capture: CaptureHandle,
        /// When recording started.
        started_at: Instant,
        /// Unique session ID for log correlation.
        session_id: Uuid,
    },
}

impl SessionState {
    /// Whether the session is idle.
    pub fn is_idle(&self) -> bool {
        matches!(self, SessionState::Idle)
    }

    /// Whether a capture is in progress.
    pub fn is_recording(&self) -> bool {
        matches!(self, SessionState::Recording { .. })
    }
}
