use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Audio capture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Directory where captured WAV files are written.
    pub recordings_dir: PathBuf,
}
