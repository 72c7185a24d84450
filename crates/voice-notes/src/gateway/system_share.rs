use crate::gateway::gateway_unavailable;

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};
use voice_notes_core::{FileReference, GatewayError, ShareTarget};

/// Shares a recording by handing the file to the OS default handler.
pub struct SystemShare;

#[async_trait]
impl ShareTarget for SystemShare {
    #[instrument(skip(self))]
    async fn share(&self, file: &FileReference) -> Result<(), GatewayError> {
        let path = PathBuf::from(file.as_str());

        if !path.exists() {
            return Err(gateway_unavailable(format!(
                "Recording file missing: {:?}",
                path
            )));
        }

        // Fire-and-forget: the handler may stay open indefinitely.
        tokio::task::spawn_blocking(move || match open::that_detached(&path) {
            Ok(()) => debug!(path = ?path, "Opened recording with system handler"),
            Err(e) => warn!(path = ?path, error = %e, "Failed to open recording"),
        });

        Ok(())
    }
}
