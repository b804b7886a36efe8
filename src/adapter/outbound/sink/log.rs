//! Event sink that only logs.

use async_trait::async_trait;
use tracing::info;

use crate::error::SinkError;
use crate::port::outbound::sink::EventSink;

/// Writes each event to the log. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl EventSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn publish(&self, payload: &str) -> Result<(), SinkError> {
        info!(payload, "Order event");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_sink_accepts_everything() {
        let sink = LogSink;
        assert_eq!(sink.name(), "log");
        tokio_test::assert_ok!(tokio_test::block_on(sink.publish("{}")));
    }
}
