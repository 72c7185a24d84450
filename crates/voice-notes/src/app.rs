use crate::{AppCommand, AppResult};

use std::{fmt::Write as _, panic::Location};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, instrument, warn};
use voice_notes_core::{
    LibraryError, ManagerView, RecordingManager, SessionStatus, format_duration,
};

/// Main application state.
///
/// Owns the recording manager and applies commands one at a time, so a new
/// intent always waits for the previous one to finish.
pub struct App {
    pub(crate) manager: RecordingManager,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Voice Notes starting");

        let loaded = self.manager.load_all().await;
        info!(entries = loaded, "Library ready");
        println!("{}", render_view(&self.manager.view()));

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    let Some(cmd) = cmd else {
                        info!("Command channel closed, shutting down");
                        break;
                    };

                    if cmd == AppCommand::Shutdown {
                        info!("Shutdown requested");
                        break;
                    }

                    self.handle_command(cmd).await;
                    println!("{}", render_view(&self.manager.view()));
                }

                signal = tokio::signal::ctrl_c() => {
                    if let Err(e) = signal {
                        error!(error = ?e, "Failed to listen for Ctrl-C");
                    }
                    info!("Interrupted, shutting down");
                    break;
                }
            }
        }

        if let Err(e) = self.manager.stop_playback().await {
            warn!(error = ?e, "Failed to stop playback on shutdown");
        }

        if self.manager.state().is_recording() {
            info!("Saving in-progress recording before exit");
            if let Err(e) = self.manager.stop_recording().await {
                error!(error = ?e, "Failed to save in-progress recording");
            }
        }

        let _ = self.shutdown_tx.send(true);
        info!("Voice Notes shut down successfully");

        Ok(())
    }

    /// Apply one command. Failures are logged; the manager stays usable.
    #[instrument(skip(self))]
    async fn handle_command(&mut self, cmd: AppCommand) {
        let result = match cmd {
            AppCommand::ToggleRecording => self.manager.toggle_recording().await,
            AppCommand::TogglePlayback { index } => match self.manager.entry_id_at(index) {
                Some(id) => self.manager.toggle_playback(id).await,
                None => Err(self.out_of_range(index)),
            },
            AppCommand::StopPlayback => self.manager.stop_playback().await,
            AppCommand::Delete { index } => self.manager.remove_at(index).await,
            AppCommand::Share { index } => match self.manager.entry_id_at(index) {
                Some(id) => self.manager.share(id).await,
                None => Err(self.out_of_range(index)),
            },
            AppCommand::List | AppCommand::Shutdown => Ok(()),
        };

        match result {
            Ok(()) => {}
            Err(LibraryError::PermissionDenied { .. }) => {
                warn!("Recording not started, microphone permission denied");
            }
            Err(e @ LibraryError::IndexOutOfRange { .. }) => {
                warn!(error = %e, "Command rejected");
                println!("No such recording");
            }
            Err(e) => {
                error!(command = ?cmd, error = ?e, "Command failed");
            }
        }
    }

    #[track_caller]
    fn out_of_range(&self, index: usize) -> LibraryError {
        LibraryError::IndexOutOfRange {
            index,
            len: self.manager.library().len(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Render the manager view as terminal text.
pub(crate) fn render_view(view: &ManagerView) -> String {
    let mut out = String::new();

    if let Some(advisory) = &view.advisory {
        let _ = writeln!(out, "! {}", advisory);
    }

    match view.session {
        SessionStatus::Idle => out.push_str("[idle] r to start recording\n"),
        SessionStatus::Recording { elapsed } => {
            let _ = writeln!(
                out,
                "[recording {}] r to stop",
                format_duration(elapsed.as_millis() as u64)
            );
        }
    }

    if view.entries.is_empty() {
        out.push_str("  (no recordings)");
    }

    for entry in &view.entries {
        let _ = write!(out, "  Recording {}  {}", entry.position, entry.duration);
        if entry.is_playing {
            out.push_str("  [playing]");
        }
        out.push('\n');
    }

    out.trim_end().to_string()
}
