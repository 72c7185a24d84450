//! Line-oriented terminal front end.
//!
//! Reads commands from stdin, parses them into [`AppCommand`]s and forwards
//! them to the application over an async channel.

use crate::{AppCommand, AppError, AppResult};

use std::{io::BufRead, panic::Location, time::Duration};

use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Help text printed on startup and after an invalid command.
pub(crate) const HELP: &str = "commands: r(ecord) | p(lay) N | s(top) | d(elete) N | x (share) N | l(ist) | q(uit)";

/// Parse one typed line.
///
/// Returns `Ok(None)` for blank lines. Recording numbers are 1-based as
/// displayed and come back as 0-based indices.
#[track_caller]
pub(crate) fn parse_command(line: &str) -> AppResult<Option<AppCommand>> {
    let mut words = line.split_whitespace();

    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let argument = words.next();

    if words.next().is_some() {
        return Err(invalid(line, "too many arguments"));
    }

    let command = match verb.to_ascii_lowercase().as_str() {
        "r" | "record" => no_argument(line, argument, AppCommand::ToggleRecording)?,
        "s" | "stop" => no_argument(line, argument, AppCommand::StopPlayback)?,
        "l" | "list" => no_argument(line, argument, AppCommand::List)?,
        "q" | "quit" | "exit" => no_argument(line, argument, AppCommand::Shutdown)?,
        "p" | "play" => AppCommand::TogglePlayback {
            index: parse_position(line, argument)?,
        },
        "d" | "delete" => AppCommand::Delete {
            index: parse_position(line, argument)?,
        },
        "x" | "share" => AppCommand::Share {
            index: parse_position(line, argument)?,
        },
        _ => return Err(invalid(line, "unknown command")),
    };

    Ok(Some(command))
}

#[track_caller]
fn no_argument(line: &str, argument: Option<&str>, command: AppCommand) -> AppResult<AppCommand> {
    match argument {
        None => Ok(command),
        Some(_) => Err(invalid(line, "command takes no argument")),
    }
}

#[track_caller]
fn parse_position(line: &str, argument: Option<&str>) -> AppResult<usize> {
    let argument = argument.ok_or_else(|| invalid(line, "expected a recording number"))?;

    let position: i64 = argument
        .parse()
        .map_err(|_| invalid(line, "recording number must be an integer"))?;

    if position < 1 {
        return Err(invalid(line, "recording numbers start at 1"));
    }

    usize::try_from(position - 1).map_err(|_| invalid(line, "recording number too large"))
}

#[track_caller]
fn invalid(line: &str, reason: &str) -> AppError {
    AppError::InvalidCommand {
        input: line.to_string(),
        reason: reason.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}

/// Forwards parsed stdin commands to the application.
pub struct CommandReader {
    command_tx: mpsc::Sender<AppCommand>,
}

impl CommandReader {
    /// Create a reader that sends into `command_tx`.
    pub fn new(command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { command_tx }
    }

    /// Run the reader until stdin closes, the user quits, or shutdown is
    /// signalled.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let (line_tx, mut line_rx) = mpsc::channel::<String>(32);

        // Single persistent blocking task that forwards stdin lines.
        // Shutdown: when line_rx is dropped (loop breaks), the next
        // blocking_send() fails, breaking the blocking loop.
        let handle = tokio::task::spawn_blocking(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if line_tx.blocking_send(line).is_err() {
                    break;
                }
            }
        });

        println!("{}", HELP);

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Command reader shutting down");
                    break;
                }
                line = line_rx.recv() => {
                    let Some(line) = line else {
                        info!("Input closed, requesting shutdown");
                        self.send(AppCommand::Shutdown).await?;
                        break;
                    };

                    match parse_command(&line) {
                        Ok(Some(command)) => {
                            debug!(command = ?command, "Command parsed");
                            self.send(command).await?;
                            if command == AppCommand::Shutdown {
                                break;
                            }
                        }
                        Ok(None) => {}
                        Err(e) => {
                            warn!(error = %e, "Rejected command");
                            println!("{}", HELP);
                        }
                    }
                }
            }
        }

        drop(line_rx);

        // Best-effort join: the blocking task may be stuck in read_line()
        // until the next line arrives. It is cleaned up on process exit.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Stdin forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Stdin forwarder task panicked"),
            Err(_) => debug!("Stdin forwarder still blocked on input, will be cleaned up on exit"),
        }

        Ok(())
    }

    async fn send(&self, command: AppCommand) -> AppResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send {:?}: {}", command, e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
