mod capture;
mod cpal_device;
mod playback;

pub(crate) use {
    capture::{CaptureWorker, write_wav},
    cpal_device::CpalAudioDevice,
    playback::{LoadedSound, PlaybackWorker, render},
};
