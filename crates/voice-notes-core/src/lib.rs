//! Voice Notes Core Library
//!
//! Recording session state machine, ordered recording library and
//! single-active-playback control, independent of any concrete audio
//! device or storage backend.
//!
//! # Example
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use voice_notes_core::{AudioDevice, KeyValueStore, ShareTarget};
//! use voice_notes_core::{CoreResult, RecordingManager};
//!
//! # async fn run(
//! #     audio: Arc<dyn AudioDevice>,
//! #     store: Arc<dyn KeyValueStore>,
//! #     share: Arc<dyn ShareTarget>,
//! # ) -> CoreResult<()> {
//! let mut manager = RecordingManager::new(audio, store, share);
//! manager.load_all().await;
//!
//! manager.start_recording().await?;
//! manager.stop_recording().await?;
//!
//! if let Some(id) = manager.entry_id_at(0) {
//!     manager.toggle_playback(id).await?;
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod gateway;
mod library;
mod manager;
mod session_state;

pub use {
    error::{GatewayError, LibraryError, Result as CoreResult},
    gateway::{
        AudioDevice, CaptureHandle, FileReference, FinishedCapture, KeyValueStore, Permission,
        ShareTarget, SoundHandle,
    },
    library::{EntryId, LIBRARY_KEY, Library, RecordingEntry, format_duration},
    manager::{EntryView, ManagerView, RecordingManager, SessionStatus},
    session_state::SessionState,
};

#[cfg(test)]
mod tests;
