mod duration;
mod entry;
#[allow(clippy::module_inception)]
mod library;

pub use {
    duration::format_duration,
    entry::{EntryId, RecordingEntry},
    library::{LIBRARY_KEY, Library},
};
