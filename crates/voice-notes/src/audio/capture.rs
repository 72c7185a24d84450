use crate::gateway::{gateway_failure, gateway_unavailable};

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, mpsc as std_mpsc},
};

use cpal::{
    StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};
use voice_notes_core::{FileReference, FinishedCapture, GatewayError};

/// Longest capture kept in memory. Samples past this point are dropped.
///
/// **Memory footprint at max capacity:**
/// - 48,000 Hz * 2 channels * 600s * 4 bytes/f32 = ~230MB
pub(crate) const MAX_CAPTURE_SECONDS: usize = 600;

/// Handle to a dedicated capture thread.
///
/// cpal streams are `!Send` on some platforms, so the stream lives on its
/// own OS thread for the whole capture and is driven through channels.
pub(crate) struct CaptureWorker {
    stop_tx: std_mpsc::Sender<()>,
    done_rx: oneshot::Receiver<Result<FinishedCapture, GatewayError>>,
}

impl CaptureWorker {
    /// Spawn the capture thread and wait until its input stream is running.
    pub(crate) async fn spawn(
        config: StreamConfig,
        output_path: PathBuf,
    ) -> Result<Self, GatewayError> {
        let (ready_tx, ready_rx) = oneshot::channel();
        let (stop_tx, stop_rx) = std_mpsc::channel();
        let (done_tx, done_rx) = oneshot::channel();

        std::thread::Builder::new()
            .name("voice-notes-capture".to_string())
            .spawn(move || run_capture(config, output_path, ready_tx, stop_rx, done_tx))
            .map_err(|e| gateway_failure(format!("Failed to spawn capture thread: {}", e)))?;

        ready_rx
            .await
            .map_err(|_| gateway_failure("Capture thread exited before starting"))??;

        Ok(Self { stop_tx, done_rx })
    }

    /// Stop the stream, write the WAV file and report what was captured.
    pub(crate) async fn finish(self) -> Result<FinishedCapture, GatewayError> {
        // A send error means the thread already exited; done_rx reports why.
        let _ = self.stop_tx.send(());

        self.done_rx
            .await
            .map_err(|_| gateway_failure("Capture thread exited without a result"))?
    }
}

fn run_capture(
    config: StreamConfig,
    output_path: PathBuf,
    ready_tx: oneshot::Sender<Result<(), GatewayError>>,
    stop_rx: std_mpsc::Receiver<()>,
    done_tx: oneshot::Sender<Result<FinishedCapture, GatewayError>>,
) {
    let max_samples = config.sample_rate as usize * config.channels as usize * MAX_CAPTURE_SECONDS;
    let samples = Arc::new(Mutex::new(Vec::<f32>::new()));

    let stream = match open_input_stream(&config, Arc::clone(&samples), max_samples) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };

    if ready_tx.send(Ok(())).is_err() {
        // Nobody is waiting for this capture any more.
        return;
    }

    info!(path = ?output_path, "Audio capture started");

    // Returns on the stop signal or when the worker handle is dropped.
    let _ = stop_rx.recv();
    drop(stream);

    let captured = std::mem::take(&mut *samples.lock().unwrap_or_else(|e| {
        error!("Sample buffer lock poisoned, recovering: {}", e);
        e.into_inner()
    }));

    debug!(sample_count = captured.len(), "Captured audio samples");

    let _ = done_tx.send(write_wav(&output_path, &config, &captured));
}

fn open_input_stream(
    config: &StreamConfig,
    samples: Arc<Mutex<Vec<f32>>>,
    max_samples: usize,
) -> Result<cpal::Stream, GatewayError> {
    let device = cpal::default_host()
        .default_input_device()
        .ok_or_else(|| gateway_unavailable("No microphone found"))?;

    let stream = device
        .build_input_stream(
            config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let mut buf = samples.lock().unwrap_or_else(|e| e.into_inner());
                let room = max_samples.saturating_sub(buf.len());
                buf.extend(data.iter().take(room).copied());
            },
            |err| {
                error!("Audio input stream error: {}", err);
            },
            None,
        )
        .map_err(|e| gateway_failure(format!("Failed to build input stream: {}", e)))?;

    stream
        .play()
        .map_err(|e| gateway_failure(format!("Failed to start input stream: {}", e)))?;

    Ok(stream)
}

/// Write interleaved f32 samples as a 32-bit float WAV file.
pub(crate) fn write_wav(
    path: &Path,
    config: &StreamConfig,
    samples: &[f32],
) -> Result<FinishedCapture, GatewayError> {
    let channels = usize::from(config.channels.max(1));
    let frames = samples.len() / channels;

    if frames == 0 {
        return Err(gateway_failure("No audio captured"));
    }

    if samples.len() >= config.sample_rate as usize * channels * MAX_CAPTURE_SECONDS {
        warn!(
            max_seconds = MAX_CAPTURE_SECONDS,
            "Capture reached maximum length, later audio was dropped"
        );
    }

    let spec = hound::WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| gateway_failure(format!("Failed to create {:?}: {}", path, e)))?;

    for sample in samples {
        writer
            .write_sample(*sample)
            .map_err(|e| gateway_failure(format!("Failed to write {:?}: {}", path, e)))?;
    }

    writer
        .finalize()
        .map_err(|e| gateway_failure(format!("Failed to finalize {:?}: {}", path, e)))?;

    let duration_millis = frames as u64 * 1000 / u64::from(config.sample_rate.max(1));

    info!(path = ?path, duration_ms = duration_millis, "Recording written");

    Ok(FinishedCapture {
        file_reference: FileReference::new(path.to_string_lossy()),
        duration_millis,
    })
}
