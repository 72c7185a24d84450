use crate::gateway::{gateway_failure, gateway_unavailable};

use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc as std_mpsc,
    },
    time::Duration,
};

use cpal::{
    StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use tokio::sync::oneshot;
use tracing::{debug, error};
use voice_notes_core::GatewayError;

/// How often the playback thread checks whether the sound has ended.
const END_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A decoded recording ready for playback.
#[derive(Debug)]
pub(crate) struct LoadedSound {
    pub(crate) samples: Vec<f32>,
    pub(crate) channels: u16,
    pub(crate) sample_rate: u32,
}

impl LoadedSound {
    /// Decode a WAV file into interleaved f32 samples.
    pub(crate) fn read_wav(path: &Path) -> Result<Self, GatewayError> {
        let mut reader = hound::WavReader::open(path)
            .map_err(|e| gateway_unavailable(format!("Failed to open {:?}: {}", path, e)))?;

        let spec = reader.spec();

        let samples: Result<Vec<f32>, hound::Error> = match spec.sample_format {
            hound::SampleFormat::Float => reader.samples::<f32>().collect(),
            hound::SampleFormat::Int => {
                let scale = (1_i64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect()
            }
        };

        let samples =
            samples.map_err(|e| gateway_failure(format!("Failed to decode {:?}: {}", path, e)))?;

        Ok(Self {
            samples,
            channels: spec.channels.max(1),
            sample_rate: spec.sample_rate.max(1),
        })
    }

    fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels)
    }
}

/// Render frames of `sound` starting at source position `cursor` into an
/// interleaved output buffer with `out_channels` channels.
///
/// `step` is source frames per output frame. Missing source channels repeat
/// the last one; past the end the output is silence. Returns the new cursor
/// and whether the end was reached.
pub(crate) fn render(
    sound: &LoadedSound,
    cursor: f64,
    step: f64,
    out_channels: usize,
    out: &mut [f32],
) -> (f64, bool) {
    let src_channels = usize::from(sound.channels);
    let total_frames = sound.frames();
    let mut cursor = cursor;
    let mut ended = false;

    for frame in out.chunks_mut(out_channels.max(1)) {
        let src_frame = cursor as usize;

        if src_frame >= total_frames {
            frame.fill(0.0);
            ended = true;
            continue;
        }

        for (ch, sample) in frame.iter_mut().enumerate() {
            let src_ch = ch.min(src_channels - 1);
            *sample = sound.samples[src_frame * src_channels + src_ch];
        }

        cursor += step;
    }

    (cursor, ended)
}

/// Handle to a dedicated playback thread. Dropping it stops playback.
pub(crate) struct PlaybackWorker {
    stop_tx: std_mpsc::Sender<()>,
    /// Set by the output callback once the sound has been fully rendered.
    ended: Arc<AtomicBool>,
}

impl PlaybackWorker {
    /// Spawn the playback thread and wait until its output stream is running.
    pub(crate) async fn spawn(sound: Arc<LoadedSound>) -> Result<Self, GatewayError> {
        let (ready_tx, ready_rx) = oneshot::channel();
        let (stop_tx, stop_rx) = std_mpsc::channel();
        let ended = Arc::new(AtomicBool::new(false));
        let thread_ended = Arc::clone(&ended);

        std::thread::Builder::new()
            .name("voice-notes-playback".to_string())
            .spawn(move || run_playback(sound, thread_ended, ready_tx, stop_rx))
            .map_err(|e| gateway_failure(format!("Failed to spawn playback thread: {}", e)))?;

        ready_rx
            .await
            .map_err(|_| gateway_failure("Playback thread exited before starting"))??;

        Ok(Self { stop_tx, ended })
    }

    /// Whether the sound played to the end.
    pub(crate) fn is_finished(&self) -> bool {
        self.ended.load(Ordering::Acquire)
    }

    /// Signal the playback thread to stop.
    pub(crate) fn stop(self) {
        // A send error means playback already ended on its own.
        let _ = self.stop_tx.send(());
    }
}

fn run_playback(
    sound: Arc<LoadedSound>,
    ended: Arc<AtomicBool>,
    ready_tx: oneshot::Sender<Result<(), GatewayError>>,
    stop_rx: std_mpsc::Receiver<()>,
) {
    let stream = match open_output_stream(Arc::clone(&sound), Arc::clone(&ended)) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };

    if ready_tx.send(Ok(())).is_err() {
        return;
    }

    loop {
        match stop_rx.recv_timeout(END_POLL_INTERVAL) {
            Ok(()) | Err(std_mpsc::RecvTimeoutError::Disconnected) => {
                debug!("Playback stopped");
                break;
            }
            Err(std_mpsc::RecvTimeoutError::Timeout) => {
                if ended.load(Ordering::Acquire) {
                    debug!("Playback reached end of sound");
                    break;
                }
            }
        }
    }

    drop(stream);
}

fn open_output_stream(
    sound: Arc<LoadedSound>,
    ended: Arc<AtomicBool>,
) -> Result<cpal::Stream, GatewayError> {
    let device = cpal::default_host()
        .default_output_device()
        .ok_or_else(|| gateway_unavailable("No output device found"))?;

    let config: StreamConfig = device
        .default_output_config()
        .map_err(|e| gateway_failure(format!("Failed to get output config: {}", e)))?
        .into();

    let out_channels = usize::from(config.channels);
    let step = f64::from(sound.sample_rate) / f64::from(config.sample_rate.max(1));
    let mut cursor = 0.0;

    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let (next, reached_end) = render(&sound, cursor, step, out_channels, data);
                cursor = next;
                if reached_end {
                    ended.store(true, Ordering::Release);
                }
            },
            |err| {
                error!("Audio output stream error: {}", err);
            },
            None,
        )
        .map_err(|e| gateway_failure(format!("Failed to build output stream: {}", e)))?;

    stream
        .play()
        .map_err(|e| gateway_failure(format!("Failed to start output stream: {}", e)))?;

    Ok(stream)
}
