//! Fan-out of placement events to every configured sink.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::event::OrderPlacedEvent;
use crate::error::SinkError;
use crate::port::inbound::intake::PublishReport;
use crate::port::outbound::sink::EventSink;

/// Per-sink retry settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ProducerConfig {
    /// Attempts per sink, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Pause between attempts on the same sink.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Bound on a single publish call; expiry counts as a failed attempt.
    #[serde(default = "default_publish_timeout_ms")]
    pub publish_timeout_ms: u64,
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_retry_delay_ms() -> u64 {
    200
}

const fn default_publish_timeout_ms() -> u64 {
    5_000
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            publish_timeout_ms: default_publish_timeout_ms(),
        }
    }
}

/// Publishes one serialized event to N sinks.
///
/// Sinks are driven concurrently and independently. A failing sink never
/// prevents or delays delivery to the others.
pub struct EventProducer {
    sinks: Vec<Arc<dyn EventSink>>,
    config: ProducerConfig,
}

impl EventProducer {
    pub fn new(config: ProducerConfig) -> Self {
        Self {
            sinks: Vec::new(),
            config,
        }
    }

    pub fn register(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.register(sink);
        self
    }

    #[must_use]
    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|sink| sink.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Serialize once and deliver to every sink.
    ///
    /// A serialization failure is reported against every sink.
    pub async fn publish(&self, event: &OrderPlacedEvent) -> PublishReport {
        match serde_json::to_string(event) {
            Ok(payload) => self.publish_payload(&payload).await,
            Err(err) => PublishReport {
                delivered: Vec::new(),
                failures: self
                    .sinks
                    .iter()
                    .map(|sink| SinkError::new(sink.name(), format!("serialization failed: {err}")))
                    .collect(),
            },
        }
    }

    /// Deliver an already serialized payload to every sink.
    pub async fn publish_payload(&self, payload: &str) -> PublishReport {
        let attempts = self
            .sinks
            .iter()
            .map(|sink| self.publish_with_retry(sink.as_ref(), payload));
        let outcomes = join_all(attempts).await;

        let mut report = PublishReport::default();
        for (sink, outcome) in self.sinks.iter().zip(outcomes) {
            match outcome {
                Ok(()) => report.delivered.push(sink.name().to_string()),
                Err(err) => report.failures.push(err),
            }
        }
        report
    }

    async fn publish_with_retry(&self, sink: &dyn EventSink, payload: &str) -> Result<(), SinkError> {
        let max_attempts = self.config.max_attempts.max(1);
        let timeout = Duration::from_millis(self.config.publish_timeout_ms);
        let mut attempt = 1;
        loop {
            let outcome = match tokio::time::timeout(timeout, sink.publish(payload)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(SinkError::new(
                    sink.name(),
                    format!("publish timed out after {}ms", timeout.as_millis()),
                )),
            };
            match outcome {
                Ok(()) => {
                    debug!(sink = sink.name(), attempt, "Event published");
                    return Ok(());
                }
                Err(err) if attempt < max_attempts => {
                    warn!(
                        sink = sink.name(),
                        attempt,
                        max_attempts,
                        error = %err,
                        "Publish failed, retrying"
                    );
                    attempt += 1;
                    tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
                }
                Err(err) => {
                    warn!(
                        sink = sink.name(),
                        attempt,
                        error = %err,
                        "Publish failed, giving up"
                    );
                    return Err(err);
                }
            }
        }
    }
}
