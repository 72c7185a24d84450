//! Audio device gateway backed by cpal and hound.
//!
//! Captures from the default input device into WAV files under the
//! configured recordings directory and plays them back on the default
//! output device.

use crate::{
    audio::{CaptureWorker, LoadedSound, PlaybackWorker},
    gateway::{gateway_failure, gateway_unavailable},
};

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use cpal::{
    StreamConfig,
    traits::{DeviceTrait, HostTrait},
};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};
use uuid::Uuid;
use voice_notes_core::{
    AudioDevice, CaptureHandle, FileReference, FinishedCapture, GatewayError, Permission,
    SoundHandle,
};

/// Default-device cpal implementation of [`AudioDevice`].
///
/// Desktop hosts have no runtime microphone permission prompt, so
/// permission is granted exactly when a default input device exists.
pub struct CpalAudioDevice {
    recordings_dir: PathBuf,
    capture_config: Mutex<Option<StreamConfig>>,
    captures: Mutex<HashMap<CaptureHandle, CaptureWorker>>,
    sounds: Mutex<HashMap<SoundHandle, Arc<LoadedSound>>>,
    playing: Mutex<HashMap<SoundHandle, PlaybackWorker>>,
}

impl CpalAudioDevice {
    /// Create a device that writes captures into `recordings_dir`.
    pub fn new(recordings_dir: impl Into<PathBuf>) -> Self {
        Self {
            recordings_dir: recordings_dir.into(),
            capture_config: Mutex::new(None),
            captures: Mutex::new(HashMap::new()),
            sounds: Mutex::new(HashMap::new()),
            playing: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl AudioDevice for CpalAudioDevice {
    #[instrument(skip(self))]
    async fn request_permission(&self) -> Result<Permission, GatewayError> {
        let has_input =
            tokio::task::spawn_blocking(|| cpal::default_host().default_input_device().is_some())
                .await
                .map_err(|e| gateway_failure(format!("Device query task panicked: {}", e)))?;

        Ok(if has_input {
            Permission::Granted
        } else {
            Permission::Denied
        })
    }

    #[instrument(skip(self))]
    async fn configure_for_capture(&self) -> Result<(), GatewayError> {
        let config = tokio::task::spawn_blocking(|| {
            let device = cpal::default_host()
                .default_input_device()
                .ok_or_else(|| gateway_unavailable("No microphone found"))?;

            let config = device
                .default_input_config()
                .map_err(|e| gateway_failure(format!("Failed to get input config: {}", e)))?;

            Ok::<StreamConfig, GatewayError>(config.into())
        })
        .await
        .map_err(|e| gateway_failure(format!("Device config task panicked: {}", e)))??;

        info!(
            sample_rate = config.sample_rate,
            channels = config.channels,
            "Capture configured"
        );

        *self.capture_config.lock().await = Some(config);

        Ok(())
    }

    #[instrument(skip(self))]
    async fn start_capture(&self) -> Result<CaptureHandle, GatewayError> {
        let config = self
            .capture_config
            .lock()
            .await
            .clone()
            .ok_or_else(|| gateway_unavailable("Capture not configured"))?;

        let output_path = self.recordings_dir.join(format!("{}.wav", Uuid::new_v4()));
        let worker = CaptureWorker::spawn(config, output_path).await?;

        let capture = CaptureHandle::new();
        self.captures.lock().await.insert(capture, worker);

        debug!(capture = %capture, "Capture worker running");

        Ok(capture)
    }

    #[instrument(skip(self))]
    async fn stop_capture(&self, capture: CaptureHandle) -> Result<FinishedCapture, GatewayError> {
        let worker = self
            .captures
            .lock()
            .await
            .remove(&capture)
            .ok_or_else(|| gateway_unavailable(format!("Unknown capture {}", capture)))?;

        worker.finish().await
    }

    #[instrument(skip(self))]
    async fn load_sound(&self, file: &FileReference) -> Result<SoundHandle, GatewayError> {
        let path = PathBuf::from(file.as_str());

        let sound = tokio::task::spawn_blocking(move || LoadedSound::read_wav(&path))
            .await
            .map_err(|e| gateway_failure(format!("Sound load task panicked: {}", e)))??;

        debug!(
            frames = sound.samples.len() / usize::from(sound.channels),
            sample_rate = sound.sample_rate,
            "Sound decoded"
        );

        let handle = SoundHandle::new();
        self.sounds.lock().await.insert(handle, Arc::new(sound));

        Ok(handle)
    }

    #[instrument(skip(self))]
    async fn play(&self, sound: &SoundHandle) -> Result<(), GatewayError> {
        let loaded = self
            .sounds
            .lock()
            .await
            .get(sound)
            .cloned()
            .ok_or_else(|| gateway_unavailable(format!("Unknown sound {}", sound)))?;

        let mut playing = self.playing.lock().await;
        playing.retain(|_, worker| !worker.is_finished());

        // Restart from the beginning if this sound is already playing.
        if let Some(previous) = playing.remove(sound) {
            previous.stop();
        }

        let worker = PlaybackWorker::spawn(loaded).await?;
        playing.insert(*sound, worker);

        Ok(())
    }

    #[instrument(skip(self))]
    async fn stop(&self, sound: &SoundHandle) -> Result<(), GatewayError> {
        if let Some(worker) = self.playing.lock().await.remove(sound) {
            worker.stop();
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn unload(&self, sound: &SoundHandle) -> Result<(), GatewayError> {
        if let Some(worker) = self.playing.lock().await.remove(sound) {
            worker.stop();
        }

        if self.sounds.lock().await.remove(sound).is_some() {
            debug!(sound = %sound, "Sound released");
        }

        Ok(())
    }
}
