mod audio_device;
mod handles;
mod key_value_store;
mod share_target;

pub use {
    audio_device::AudioDevice,
    handles::{CaptureHandle, FileReference, FinishedCapture, Permission, SoundHandle},
    key_value_store::KeyValueStore,
    share_target::ShareTarget,
};
