//! Notification sink port.

use async_trait::async_trait;

use crate::error::SinkError;

/// Downstream destination for serialized placement events.
///
/// Every sink receives the same JSON payload. A failure on one sink must not
/// affect any other.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Name used in logs and in [`SinkError::sink`].
    fn name(&self) -> &str;

    /// Deliver one payload.
    async fn publish(&self, payload: &str) -> Result<(), SinkError>;
}
