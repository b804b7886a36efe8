//! Event sink publishing to a topic on the topic broker.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SinkError;
use crate::port::outbound::broker::TopicPublisher;
use crate::port::outbound::sink::EventSink;

/// Publishes events to a topic on the queue/topic broker.
pub struct TopicSink {
    name: String,
    publisher: Arc<dyn TopicPublisher>,
    topic: String,
}

impl TopicSink {
    pub fn new(
        name: impl Into<String>,
        publisher: Arc<dyn TopicPublisher>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            publisher,
            topic: topic.into(),
        }
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

#[async_trait]
impl EventSink for TopicSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn publish(&self, payload: &str) -> Result<(), SinkError> {
        self.publisher
            .publish_to_topic(&self.topic, payload)
            .await
            .map_err(|e| SinkError::new(&self.name, e.to_string()))
    }
}
