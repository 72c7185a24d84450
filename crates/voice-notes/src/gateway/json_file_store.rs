//! Key-value store persisted as a single JSON object on disk.

use crate::gateway::gateway_failure;

use std::{
    collections::BTreeMap,
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};
use voice_notes_core::{GatewayError, KeyValueStore};

/// String key-value store backed by one JSON file.
///
/// Every `set` rewrites the whole file with the temp-file-and-rename
/// pattern, so a crash mid-write leaves the previous contents intact. A
/// file that cannot be parsed fails `get`; the next `set` moves it to
/// `<path>.corrupt` and writes a fresh one.
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles.
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Store backed by the file at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }
}

fn read_contents(path: &Path) -> Result<Option<String>, GatewayError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(gateway_failure(format!("Failed to read {:?}: {}", path, e))),
    }
}

fn parse_map(path: &Path, contents: &str) -> Result<BTreeMap<String, String>, GatewayError> {
    serde_json::from_str(contents)
        .map_err(|e| gateway_failure(format!("Failed to parse {:?}: {}", path, e)))
}

fn read_map(path: &Path) -> Result<BTreeMap<String, String>, GatewayError> {
    match read_contents(path)? {
        Some(contents) => parse_map(path, &contents),
        None => Ok(BTreeMap::new()),
    }
}

/// Like [`read_map`], but an unparseable file is moved to
/// `<path>.corrupt` and writing starts from an empty map.
fn read_map_for_write(path: &Path) -> Result<BTreeMap<String, String>, GatewayError> {
    let Some(contents) = read_contents(path)? else {
        return Ok(BTreeMap::new());
    };

    match parse_map(path, &contents) {
        Ok(map) => Ok(map),
        Err(e) => {
            let backup = corrupt_path(path);
            warn!(path = ?path, backup = ?backup, error = %e, "Store file unreadable, replacing it");
            if let Err(e) = fs::rename(path, &backup) {
                warn!(path = ?path, error = %e, "Failed to set aside unreadable store file");
            }
            Ok(BTreeMap::new())
        }
    }
}

/// Where an unparseable store file is kept: `library.json` becomes
/// `library.json.corrupt`.
fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".corrupt");
    PathBuf::from(name)
}

fn write_map(path: &Path, map: &BTreeMap<String, String>) -> Result<(), GatewayError> {
    let contents = serde_json::to_string_pretty(map)
        .map_err(|e| gateway_failure(format!("Failed to encode store: {}", e)))?;

    let temp_path = path.with_extension("json.tmp");

    let mut temp_file = fs::File::create(&temp_path)
        .map_err(|e| gateway_failure(format!("Failed to create {:?}: {}", temp_path, e)))?;

    temp_file
        .write_all(contents.as_bytes())
        .map_err(|e| gateway_failure(format!("Failed to write {:?}: {}", temp_path, e)))?;

    temp_file
        .sync_all()
        .map_err(|e| gateway_failure(format!("Failed to sync {:?}: {}", temp_path, e)))?;

    fs::rename(&temp_path, path)
        .map_err(|e| gateway_failure(format!("Failed to rename {:?}: {}", temp_path, e)))
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>, GatewayError> {
        let _guard = self.lock.lock().await;
        let path = self.path.clone();

        let mut map = tokio::task::spawn_blocking(move || read_map(&path))
            .await
            .map_err(|e| gateway_failure(format!("Store read task panicked: {}", e)))??;

        Ok(map.remove(key))
    }

    #[instrument(skip(self, value), fields(value_len = value.len()))]
    async fn set(&self, key: &str, value: String) -> Result<(), GatewayError> {
        let _guard = self.lock.lock().await;
        let path = self.path.clone();
        let key = key.to_string();

        tokio::task::spawn_blocking(move || {
            let mut map = read_map_for_write(&path)?;
            map.insert(key, value);
            write_map(&path, &map)
        })
        .await
        .map_err(|e| gateway_failure(format!("Store write task panicked: {}", e)))??;

        debug!(path = ?self.path, "Store written");

        Ok(())
    }
}
