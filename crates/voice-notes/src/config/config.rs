//! TOML configuration for voice-notes.
//!
//! The file lives in the platform config directory; recordings and the
//! library default to the platform data directory. Writes go through a
//! temp file and a rename.

use crate::{
    AppError, AppResult,
    config::{AudioConfig, LoggingConfig, StorageConfig},
};

use std::{
    fmt::Display,
    fs,
    io::Write,
    panic::Location,
    path::Path,
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where captured audio files are written.
    pub audio: AudioConfig,
    /// Where the library snapshot is kept.
    pub storage: StorageConfig,
    /// Log output configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// On-disk shape: every section may be left out.
#[derive(Deserialize)]
struct ConfigFile {
    audio: Option<AudioConfig>,
    storage: Option<StorageConfig>,
    #[serde(default)]
    logging: LoggingConfig,
}

impl Config {
    /// Load the config from the platform config directory, writing a default
    /// one on first run.
    ///
    /// Runs before the tracing subscriber is installed, so its own log
    /// lines are dropped.
    #[track_caller]
    pub fn load() -> AppResult<Self> {
        let dirs = Self::project_dirs()?;
        let config_dir = dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        Self::load_from(&config_dir.join("config.toml"), dirs.data_dir())
    }

    /// Load from `path`, or create and save the default rooted at
    /// `data_dir` if the file does not exist.
    #[track_caller]
    #[instrument]
    pub fn load_from(path: &Path, data_dir: &Path) -> AppResult<Self> {
        if !path.exists() {
            info!("No config found, creating default");
            let config = Self::with_data_dir(data_dir);
            config.save_to(path)?;
            return Ok(config);
        }

        let contents =
            fs::read_to_string(path).map_err(|e| config_error("read config", e))?;
        let config = Self::from_toml(&contents, data_dir)?;

        info!(config_path = ?path, "Configuration loaded");

        Ok(config)
    }

    /// Parse a TOML document. Missing `[audio]` or `[storage]` sections
    /// default to paths under `data_dir`.
    #[track_caller]
    pub fn from_toml(contents: &str, data_dir: &Path) -> AppResult<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| config_error("parse config", e))?;
        let defaults = Self::with_data_dir(data_dir);

        Ok(Config {
            audio: file.audio.unwrap_or(defaults.audio),
            storage: file.storage.unwrap_or(defaults.storage),
            logging: file.logging,
        })
    }

    /// Default configuration rooted at `data_dir`.
    pub fn with_data_dir(data_dir: &Path) -> Self {
        Config {
            audio: AudioConfig {
                recordings_dir: data_dir.join("recordings"),
            },
            storage: StorageConfig {
                library_path: data_dir.join("library.json"),
            },
            logging: LoggingConfig::default(),
        }
    }

    /// Create the recordings directory, the library file's parent and the
    /// log directory.
    #[track_caller]
    pub fn prepare_directories(&self) -> AppResult<()> {
        fs::create_dir_all(&self.audio.recordings_dir)?;

        if let Some(parent) = self.storage.library_path.parent() {
            fs::create_dir_all(parent)?;
        }

        if let Some(log_dir) = &self.logging.directory {
            fs::create_dir_all(log_dir)?;
        }

        Ok(())
    }

    /// Save to `path` atomically: write `<path>.tmp`, fsync, rename.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| config_error("serialize config", e))?;

        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file =
            fs::File::create(&temp_path).map_err(|e| config_error("create temp config", e))?;
        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| config_error("write temp config", e))?;
        temp_file
            .sync_all()
            .map_err(|e| config_error("sync temp config", e))?;

        fs::rename(&temp_path, path).map_err(|e| config_error("replace config", e))?;

        debug!(config_path = ?path, "Configuration saved");

        Ok(())
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "voice-notes", "Voice-Notes").ok_or_else(|| {
            AppError::ConfigError {
                reason: "No home directory to derive config paths from".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }
}

#[track_caller]
fn config_error(action: &str, e: impl Display) -> AppError {
    AppError::ConfigError {
        reason: format!("Failed to {}: {}", action, e),
        location: ErrorLocation::from(Location::caller()),
    }
}

