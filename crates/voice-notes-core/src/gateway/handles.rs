use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of a microphone permission query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Capture may proceed.
    Granted,
    /// The user or platform refused access.
    Denied,
}

/// Opaque handle to an in-progress capture, issued by the audio device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureHandle(Uuid);

impl CaptureHandle {
    /// Issue a fresh capture handle.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CaptureHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CaptureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque handle to a loaded, playable sound, issued by the audio device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(Uuid);

impl SoundHandle {
    /// Issue a fresh sound handle.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SoundHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SoundHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// URI or path of a recorded audio asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileReference(String);

impl FileReference {
    /// Wrap a URI or path string.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// The underlying URI or path.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the device hands back once a capture is stopped and flushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedCapture {
    /// Where the captured audio was written.
    pub file_reference: FileReference,
    /// Length of the capture in milliseconds.
    pub duration_millis: u64,
}
