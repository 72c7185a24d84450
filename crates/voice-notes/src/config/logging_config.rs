use crate::config::default_log_filter;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Log output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive. `RUST_LOG` overrides it.
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Directory for daily-rolling log files (None = stderr only).
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Write the log file as JSON lines instead of plain text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            directory: None,
            json: false,
        }
    }
}
