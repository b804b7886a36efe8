//! Message broker contracts.
//!
//! Inbound consumers pull [`Delivery`] values from a [`MessageSource`] and
//! hand each one back with a [`Disposition`]. Sinks publish through
//! [`TopicPublisher`] or [`ExchangePublisher`].

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::BrokerError;

/// One message handed to a consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Broker-assigned id, stable across redeliveries.
    pub id: Uuid,
    /// Raw message body.
    pub payload: String,
    /// 1 on first delivery, incremented on each redelivery.
    pub attempt: u32,
}

impl Delivery {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload: payload.into(),
            attempt: 1,
        }
    }

    /// Same message, next attempt.
    #[must_use]
    pub fn redelivered(self) -> Self {
        Self {
            attempt: self.attempt.saturating_add(1),
            ..self
        }
    }
}

/// How a consumer settles a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Processed; remove from the queue.
    Ack,
    /// Put back for another attempt.
    Redeliver,
    /// Route to the queue's dead-letter destination.
    DeadLetter { reason: String },
    /// Negative acknowledgement. Without `requeue` the broker applies the
    /// queue's dead-letter binding, if any.
    Reject { requeue: bool },
}

impl Disposition {
    /// True when the message leaves the main queue for good without success.
    #[must_use]
    pub fn is_dead_letter(&self) -> bool {
        matches!(
            self,
            Self::DeadLetter { .. } | Self::Reject { requeue: false }
        )
    }
}

/// A consumable queue.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Queue name, for logs.
    fn queue(&self) -> &str;

    /// Wait for the next delivery. `None` once the source is closed and drained.
    async fn receive(&self) -> Option<Delivery>;

    /// Settle a delivery previously returned by [`receive`](Self::receive).
    async fn settle(&self, delivery: Delivery, disposition: Disposition) -> Result<(), BrokerError>;
}

/// Topic-addressed publishing (broadcast to every subscriber).
#[async_trait]
pub trait TopicPublisher: Send + Sync {
    async fn publish_to_topic(&self, topic: &str, payload: &str) -> Result<(), BrokerError>;
}

/// Exchange + routing-key addressed publishing.
#[async_trait]
pub trait ExchangePublisher: Send + Sync {
    async fn publish_to_exchange(
        &self,
        exchange: &str,
        routing_key: &str,
        payload: &str,
    ) -> Result<(), BrokerError>;
}

/// Liveness probe for a broker connection.
#[async_trait]
pub trait BrokerProbe: Send + Sync {
    fn name(&self) -> &str;

    async fn ping(&self) -> Result<(), BrokerError>;
}
