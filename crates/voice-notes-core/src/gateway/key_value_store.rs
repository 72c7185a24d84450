use crate::GatewayError;

use async_trait::async_trait;

/// Durable string key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, or `None` if it was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, GatewayError>;

    /// Write `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<(), GatewayError>;
}
