//! Event sink publishing to an exchange under a routing key.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SinkError;
use crate::port::outbound::broker::ExchangePublisher;
use crate::port::outbound::sink::EventSink;

/// Publishes events to an exchange under a fixed routing key.
pub struct ExchangeSink {
    name: String,
    publisher: Arc<dyn ExchangePublisher>,
    exchange: String,
    routing_key: String,
}

impl ExchangeSink {
    pub fn new(
        name: impl Into<String>,
        publisher: Arc<dyn ExchangePublisher>,
        exchange: impl Into<String>,
        routing_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            publisher,
            exchange: exchange.into(),
            routing_key: routing_key.into(),
        }
    }
}

#[async_trait]
impl EventSink for ExchangeSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn publish(&self, payload: &str) -> Result<(), SinkError> {
        self.publisher
            .publish_to_exchange(&self.exchange, &self.routing_key, payload)
            .await
            .map_err(|e| SinkError::new(&self.name, e.to_string()))
    }
}
