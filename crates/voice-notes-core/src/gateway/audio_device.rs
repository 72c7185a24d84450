use crate::{
    GatewayError,
    gateway::{CaptureHandle, FileReference, FinishedCapture, Permission, SoundHandle},
};

use async_trait::async_trait;

/// Microphone capture and sound playback.
///
/// Every call may fail; the recording manager converts failures into
/// [`LibraryError`](crate::LibraryError) conditions and never lets them
/// leave its state half-applied.
#[async_trait]
pub trait AudioDevice: Send + Sync {
    /// Ask whether the microphone may be used.
    async fn request_permission(&self) -> Result<Permission, GatewayError>;

    /// Put the device into capture mode.
    async fn configure_for_capture(&self) -> Result<(), GatewayError>;

    /// Begin capturing audio.
    async fn start_capture(&self) -> Result<CaptureHandle, GatewayError>;

    /// Stop a capture and flush it to storage.
    async fn stop_capture(&self, capture: CaptureHandle) -> Result<FinishedCapture, GatewayError>;

    /// Load a recorded asset into a playable sound.
    async fn load_sound(&self, file: &FileReference) -> Result<SoundHandle, GatewayError>;

    /// Start playing a loaded sound from the beginning.
    async fn play(&self, sound: &SoundHandle) -> Result<(), GatewayError>;

    /// Stop a sound. Stopping a sound that is not playing succeeds.
    async fn stop(&self, sound: &SoundHandle) -> Result<(), GatewayError>;

    /// Release a loaded sound, stopping it first if needed. The handle is
    /// invalid afterwards. Unloading an unknown handle succeeds.
    async fn unload(&self, sound: &SoundHandle) -> Result<(), GatewayError>;
}
