//! Voice Notes: record, list, play back and share audio clips.

mod app;
mod app_command;
mod audio;
mod command_reader;
mod config;
mod error;
mod gateway;
mod logging;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    audio::CpalAudioDevice,
    command_reader::CommandReader,
    error::{AppError, Result as AppResult},
    gateway::{JsonFileStore, SystemShare},
};

use crate::config::Config;

use std::{sync::Arc, time::Duration};

use tokio::sync::{mpsc, watch};
use tracing::{error, info};
use voice_notes_core::RecordingManager;

/// Application entry point.
fn main() {
    // Loaded before the subscriber exists: the config says where logs go.
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let _log_guard = logging::init_tracing(&config.logging);

    info!(
        recordings_dir = ?config.audio.recordings_dir,
        library_path = ?config.storage.library_path,
        "Configuration ready"
    );

    if let Err(e) = config.prepare_directories() {
        error!("Failed to create data directories: {:?}", e);
        std::process::exit(1);
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    rt.block_on(run(config));

    // The stdin forwarder may still be blocked on a read; don't wait for it.
    rt.shutdown_timeout(Duration::from_secs(1));
}

async fn run(config: Config) {
    let audio = Arc::new(CpalAudioDevice::new(&config.audio.recordings_dir));
    let store = Arc::new(JsonFileStore::new(&config.storage.library_path));
    let manager = RecordingManager::new(audio, store, Arc::new(SystemShare));

    let (command_tx, command_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let reader = CommandReader::new(command_tx);

    let app = App {
        manager,
        command_rx,
        shutdown_tx,
    };

    tokio::join!(
        async {
            if let Err(e) = reader.run(shutdown_rx).await {
                error!(error = ?e, "Command reader error");
            }
        },
        async {
            if let Err(e) = app.run().await {
                error!(error = ?e, "App error");
            }
        }
    );
}
