#[allow(clippy::module_inception)]
mod manager;
mod playback;
mod recording;
mod removal;
mod view;

pub use {
    manager::RecordingManager,
    view::{EntryView, ManagerView, SessionStatus},
};
