use crate::{GatewayError, gateway::FileReference};

use async_trait::async_trait;

/// Hands a recorded file to whatever the platform uses for sharing.
#[async_trait]
pub trait ShareTarget: Send + Sync {
    /// Offer `file` for sharing. Implementations should not wait for the
    /// user to finish.
    async fn share(&self, file: &FileReference) -> Result<(), GatewayError>;
}
