use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Library persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file backing the key-value store.
    pub library_path: PathBuf,
}
