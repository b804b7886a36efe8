//! Exchange/queue broker.
//!
//! Publishers address an exchange plus a routing key; queues bind to an
//! exchange under a key and receive exact-match copies. A queue may name a
//! dead-letter exchange and routing key, applied when a consumer rejects a
//! message without requeue.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::BrokerError;
use crate::port::outbound::broker::{
    BrokerProbe, Delivery, Disposition, ExchangePublisher, MessageSource,
};

use super::queue::MessageQueue;

/// Default queue used by [`BrokerProbe::ping`].
pub const HEALTHCHECK_QUEUE: &str = "healthcheck";

/// Optional queue arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueArgs {
    pub dead_letter_exchange: Option<String>,
    pub dead_letter_routing_key: Option<String>,
    /// Oldest messages are dropped beyond this length.
    pub max_length: Option<usize>,
}

impl QueueArgs {
    pub fn dead_letter(exchange: impl Into<String>, routing_key: impl Into<String>) -> Self {
        Self {
            dead_letter_exchange: Some(exchange.into()),
            dead_letter_routing_key: Some(routing_key.into()),
            max_length: None,
        }
    }

    #[must_use]
    pub fn bounded(max_length: usize) -> Self {
        Self {
            max_length: Some(max_length),
            ..Self::default()
        }
    }
}

struct Binding {
    routing_key: String,
    queue: Arc<MessageQueue>,
}

#[derive(Default)]
struct Topology {
    exchanges: HashMap<String, Vec<Binding>>,
    queues: HashMap<String, (Arc<MessageQueue>, QueueArgs)>,
}

impl Topology {
    fn route(&self, exchange: &str, routing_key: &str) -> Result<Vec<Arc<MessageQueue>>, BrokerError> {
        let bindings = self
            .exchanges
            .get(exchange)
            .ok_or_else(|| BrokerError::UnknownDestination(exchange.to_string()))?;
        Ok(bindings
            .iter()
            .filter(|binding| binding.routing_key == routing_key)
            .map(|binding| Arc::clone(&binding.queue))
            .collect())
    }
}

/// In-process exchange/queue broker.
pub struct ExchangeBroker {
    name: String,
    topology: Arc<RwLock<Topology>>,
    health_check_queue: String,
    reachable: AtomicBool,
}

impl ExchangeBroker {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_health_check_queue(name, HEALTHCHECK_QUEUE)
    }

    /// Broker whose liveness probe round-trips through `health_check_queue`.
    pub fn with_health_check_queue(name: impl Into<String>, health_check_queue: &str) -> Self {
        let broker = Self {
            name: name.into(),
            topology: Arc::new(RwLock::new(Topology::default())),
            health_check_queue: health_check_queue.to_string(),
            reachable: AtomicBool::new(true),
        };
        broker.declare_queue(health_check_queue, QueueArgs::default());
        broker
    }

    /// Declare an exchange. Idempotent.
    pub fn declare_exchange(&self, exchange: &str) {
        self.topology
            .write()
            .exchanges
            .entry(exchange.to_string())
            .or_default();
    }

    /// Declare a queue. Re-declaring keeps the existing queue and arguments.
    pub fn declare_queue(&self, name: &str, args: QueueArgs) -> Arc<MessageQueue> {
        let mut topology = self.topology.write();
        let (queue, _) = topology
            .queues
            .entry(name.to_string())
            .or_insert_with(|| {
                let queue = MessageQueue::with_max_length(name, args.max_length);
                (Arc::new(queue), args)
            });
        Arc::clone(queue)
    }

    /// Bind a declared queue to a declared exchange under `routing_key`.
    pub fn bind(&self, queue: &str, exchange: &str, routing_key: &str) -> Result<(), BrokerError> {
        let mut topology = self.topology.write();
        let target = topology
            .queues
            .get(queue)
            .map(|(queue, _)| Arc::clone(queue))
            .ok_or_else(|| BrokerError::UnknownDestination(queue.to_string()))?;
        let bindings = topology
            .exchanges
            .get_mut(exchange)
            .ok_or_else(|| BrokerError::UnknownDestination(exchange.to_string()))?;
        bindings.push(Binding {
            routing_key: routing_key.to_string(),
            queue: target,
        });
        debug!(broker = %self.name, queue, exchange, routing_key, "Queue bound");
        Ok(())
    }

    #[must_use]
    pub fn queue(&self, name: &str) -> Option<Arc<MessageQueue>> {
        self.topology
            .read()
            .queues
            .get(name)
            .map(|(queue, _)| Arc::clone(queue))
    }

    /// Enqueue directly on a queue (default-exchange semantics).
    pub fn publish_to_queue(&self, queue: &str, payload: &str) -> Result<(), BrokerError> {
        self.ensure_reachable()?;
        let target = self
            .queue(queue)
            .ok_or_else(|| BrokerError::UnknownDestination(queue.to_string()))?;
        if target.is_closed() {
            return Err(BrokerError::Closed);
        }
        target.push(Delivery::new(payload));
        Ok(())
    }

    /// Consumer handle on a declared queue.
    pub fn consumer(&self, queue: &str) -> Result<ExchangeQueueSource, BrokerError> {
        let topology = self.topology.read();
        let (target, args) = topology
            .queues
            .get(queue)
            .ok_or_else(|| BrokerError::UnknownDestination(queue.to_string()))?;
        Ok(ExchangeQueueSource {
            queue: Arc::clone(target),
            args: args.clone(),
            topology: Arc::clone(&self.topology),
        })
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::Release);
    }

    pub fn close(&self) {
        for (queue, _) in self.topology.read().queues.values() {
            queue.close();
        }
    }

    fn ensure_reachable(&self) -> Result<(), BrokerError> {
        if self.reachable.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(BrokerError::Unreachable(self.name.clone()))
        }
    }
}

#[async_trait]
impl ExchangePublisher for ExchangeBroker {
    async fn publish_to_exchange(
        &self,
        exchange: &str,
        routing_key: &str,
        payload: &str,
    ) -> Result<(), BrokerError> {
        self.ensure_reachable()?;
        let targets = self.topology.read().route(exchange, routing_key)?;
        if targets.is_empty() {
            debug!(broker = %self.name, exchange, routing_key, "No binding matched, message dropped");
        }
        for target in targets {
            target.push(Delivery::new(payload));
        }
        Ok(())
    }
}

#[async_trait]
impl BrokerProbe for ExchangeBroker {
    fn name(&self) -> &str {
        &self.name
    }

    /// Round-trips a message through the healthcheck queue.
    async fn ping(&self) -> Result<(), BrokerError> {
        self.publish_to_queue(&self.health_check_queue, "ping")?;
        let queue = self
            .queue(&self.health_check_queue)
            .ok_or_else(|| BrokerError::UnknownDestination(self.health_check_queue.clone()))?;
        while queue.try_pop().is_some() {}
        Ok(())
    }
}

/// Consumer side of one exchange-broker queue.
pub struct ExchangeQueueSource {
    queue: Arc<MessageQueue>,
    args: QueueArgs,
    topology: Arc<RwLock<Topology>>,
}

impl ExchangeQueueSource {
    fn dead_letter(&self, delivery: Delivery) {
        let Some(exchange) = self.args.dead_letter_exchange.as_deref() else {
            warn!(queue = self.queue.name(), message_id = %delivery.id, "No dead-letter exchange, message discarded");
            return;
        };
        let routing_key = self.args.dead_letter_routing_key.as_deref().unwrap_or("");
        let targets = match self.topology.read().route(exchange, routing_key) {
            Ok(targets) => targets,
            Err(e) => {
                warn!(queue = self.queue.name(), error = %e, "Dead-letter route failed, message discarded");
                return;
            }
        };
        if targets.is_empty() {
            warn!(queue = self.queue.name(), exchange, routing_key, "Dead-letter exchange has no binding, message discarded");
        }
        for target in targets {
            target.push(Delivery {
                attempt: 1,
                ..delivery.clone()
            });
        }
    }
}

#[async_trait]
impl MessageSource for ExchangeQueueSource {
    fn queue(&self) -> &str {
        self.queue.name()
    }

    async fn receive(&self) -> Option<Delivery> {
        self.queue.pop().await
    }

    async fn settle(&self, delivery: Delivery, disposition: Disposition) -> Result<(), BrokerError> {
        match disposition {
            Disposition::Ack => {}
            Disposition::Redeliver | Disposition::Reject { requeue: true } => {
                self.queue.push(delivery.redelivered());
            }
            Disposition::DeadLetter { .. } | Disposition::Reject { requeue: false } => {
                self.dead_letter(delivery);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn broker() -> ExchangeBroker {
        let broker = ExchangeBroker::new("exchange-broker");
        broker.declare_exchange("order.exchange");
        broker.declare_exchange("dlq.exchange");
        broker.declare_queue(
            "orders",
            QueueArgs::dead_letter("dlq.exchange", "orders.dlq"),
        );
        broker.declare_queue("orders.dlq", QueueArgs::default());
        broker.bind("orders", "order.exchange", "orders").unwrap();
        broker.bind("orders.dlq", "dlq.exchange", "orders.dlq").unwrap();
        broker
    }

    #[tokio::test]
    async fn routes_by_exact_key() {
        let broker = broker();
        broker
            .publish_to_exchange("order.exchange", "orders", "{}")
            .await
            .unwrap();
        broker
            .publish_to_exchange("order.exchange", "other", "{}")
            .await
            .unwrap();
        assert_eq!(broker.queue("orders").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_exchange_is_an_error() {
        let err = broker()
            .publish_to_exchange("missing", "orders", "{}")
            .await
            .unwrap_err();
        assert!(matches!(err, BrokerError::UnknownDestination(_)));
    }

    #[tokio::test]
    async fn reject_without_requeue_goes_through_dlx() {
        let broker = broker();
        broker.publish_to_queue("orders", "bad").unwrap();
        let source = broker.consumer("orders").unwrap();
        let delivery = source.receive().await.unwrap();
        source
            .settle(delivery, Disposition::Reject { requeue: false })
            .await
            .unwrap();

        assert!(broker.queue("orders").unwrap().is_empty());
        assert_eq!(broker.queue("orders.dlq").unwrap().payloads(), vec!["bad"]);
    }

    #[tokio::test]
    async fn reject_with_requeue_stays_on_queue() {
        let broker = broker();
        broker.publish_to_queue("orders", "{}").unwrap();
        let source = broker.consumer("orders").unwrap();
        let delivery = source.receive().await.unwrap();
        source
            .settle(delivery, Disposition::Reject { requeue: true })
            .await
            .unwrap();
        let again = source.receive().await.unwrap();
        assert_eq!(again.attempt, 2);
    }

    #[tokio::test]
    async fn ping_round_trips_healthcheck_queue() {
        let broker = broker();
        broker.ping().await.unwrap();
        assert!(broker.queue(HEALTHCHECK_QUEUE).unwrap().is_empty());

        broker.set_reachable(false);
        assert!(matches!(broker.ping().await, Err(BrokerError::Unreachable(_))));
    }
}
