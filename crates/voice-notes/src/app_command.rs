/// Commands sent from the command reader to the main application.
///
/// Positions are 0-based library indices; the reader converts from the
/// 1-based numbers shown on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Start recording when idle, stop and save when recording.
    ToggleRecording,
    /// Play the entry at `index`, or stop it if it is already playing.
    TogglePlayback {
        /// Library index.
        index: usize,
    },
    /// Stop whatever is playing.
    StopPlayback,
    /// Delete the entry at `index`.
    Delete {
        /// Library index.
        index: usize,
    },
    /// Share the entry at `index`.
    Share {
        /// Library index.
        index: usize,
    },
    /// Print the library.
    List,
    /// Request application shutdown.
    Shutdown,
}
