//! Queue/topic broker.
//!
//! Point-to-point queues each carry a dead-letter queue. Topics broadcast to
//! every subscribed queue. Redelivery puts a message back at the tail with
//! its attempt counter bumped; the consumer decides when to stop.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::BrokerError;
use crate::port::outbound::broker::{
    BrokerProbe, Delivery, Disposition, MessageSource, TopicPublisher,
};

use super::queue::MessageQueue;

struct QueueEntry {
    queue: Arc<MessageQueue>,
    dead_letter: Arc<MessageQueue>,
}

/// In-process queue/topic broker.
pub struct TopicBroker {
    name: String,
    queues: RwLock<HashMap<String, QueueEntry>>,
    topics: RwLock<HashMap<String, Vec<Arc<MessageQueue>>>>,
    reachable: AtomicBool,
}

impl TopicBroker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            queues: RwLock::new(HashMap::new()),
            topics: RwLock::new(HashMap::new()),
            reachable: AtomicBool::new(true),
        }
    }

    /// Declare a queue and its dead-letter queue. Idempotent.
    pub fn declare_queue(&self, queue: &str, dead_letter_queue: &str) -> Arc<MessageQueue> {
        let mut queues = self.queues.write();
        if let Some(entry) = queues.get(queue) {
            return Arc::clone(&entry.queue);
        }
        let dead_letter = queues
            .get(dead_letter_queue)
            .map(|entry| Arc::clone(&entry.queue))
            .unwrap_or_else(|| Arc::new(MessageQueue::new(dead_letter_queue)));
        let main = Arc::new(MessageQueue::new(queue));
        queues.insert(
            queue.to_string(),
            QueueEntry {
                queue: Arc::clone(&main),
                dead_letter: Arc::clone(&dead_letter),
            },
        );
        queues
            .entry(dead_letter_queue.to_string())
            .or_insert_with(|| QueueEntry {
                queue: Arc::clone(&dead_letter),
                dead_letter: Arc::clone(&dead_letter),
            });
        debug!(broker = %self.name, queue, dead_letter_queue, "Queue declared");
        main
    }

    /// Attach a subscriber queue to a topic.
    pub fn subscribe(&self, topic: &str, queue: Arc<MessageQueue>) {
        self.topics
            .write()
            .entry(topic.to_string())
            .or_default()
            .push(queue);
    }

    /// Look up a declared queue.
    #[must_use]
    pub fn queue(&self, name: &str) -> Option<Arc<MessageQueue>> {
        self.queues.read().get(name).map(|entry| Arc::clone(&entry.queue))
    }

    /// Enqueue a raw payload on a declared queue.
    pub fn send(&self, queue: &str, payload: &str) -> Result<(), BrokerError> {
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
    pub fn consumer(&self, queue: &str) -> Result<TopicQueueSource, BrokerError> {
        let queues = self.queues.read();
        let entry = queues
            .get(queue)
            .ok_or_else(|| BrokerError::UnknownDestination(queue.to_string()))?;
        Ok(TopicQueueSource {
            queue: Arc::clone(&entry.queue),
            dead_letter: Arc::clone(&entry.dead_letter),
        })
    }

    /// Simulate losing or regaining the broker connection.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::Release);
    }

    /// Close every queue; waiting consumers drain and stop.
    pub fn close(&self) {
        for entry in self.queues.read().values() {
            entry.queue.close();
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
impl TopicPublisher for TopicBroker {
    async fn publish_to_topic(&self, topic: &str, payload: &str) -> Result<(), BrokerError> {
        self.ensure_reachable()?;
        let topics = self.topics.read();
        let subscribers = topics.get(topic).map(Vec::as_slice).unwrap_or_default();
        for subscriber in subscribers {
            subscriber.push(Delivery::new(payload));
        }
        debug!(broker = %self.name, topic, subscribers = subscribers.len(), "Published to topic");
        Ok(())
    }
}

#[async_trait]
impl BrokerProbe for TopicBroker {
    fn name(&self) -> &str {
        &self.name
    }

    async fn ping(&self) -> Result<(), BrokerError> {
        self.ensure_reachable()
    }
}

/// Consumer side of one topic-broker queue.
pub struct TopicQueueSource {
    queue: Arc<MessageQueue>,
    dead_letter: Arc<MessageQueue>,
}

#[async_trait]
impl MessageSource for TopicQueueSource {
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
                self.dead_letter.push(delivery);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn broker() -> TopicBroker {
        let broker = TopicBroker::new("topic-broker");
        broker.declare_queue("orders", "orders.dlq");
        broker
    }

    #[tokio::test]
    async fn redelivery_bumps_attempt() {
        let broker = broker();
        broker.send("orders", "{}").unwrap();
        let source = broker.consumer("orders").unwrap();

        let first = source.receive().await.unwrap();
        assert_eq!(first.attempt, 1);
        source.settle(first.clone(), Disposition::Redeliver).await.unwrap();

        let second = source.receive().await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.attempt, 2);
    }

    #[tokio::test]
    async fn dead_letter_moves_to_dlq() {
        let broker = broker();
        broker.send("orders", "bad").unwrap();
        let source = broker.consumer("orders").unwrap();
        let delivery = source.receive().await.unwrap();
        source
            .settle(
                delivery,
                Disposition::DeadLetter {
                    reason: "malformed".into(),
                },
            )
            .await
            .unwrap();

        assert!(broker.queue("orders").unwrap().is_empty());
        assert_eq!(broker.queue("orders.dlq").unwrap().payloads(), vec!["bad"]);
    }

    #[tokio::test]
    async fn topic_fans_out_to_subscribers() {
        let broker = broker();
        let a = Arc::new(MessageQueue::new("a"));
        let b = Arc::new(MessageQueue::new("b"));
        broker.subscribe("placed", Arc::clone(&a));
        broker.subscribe("placed", Arc::clone(&b));

        broker.publish_to_topic("placed", "evt").await.unwrap();
        assert_eq!(a.payloads(), vec!["evt"]);
        assert_eq!(b.payloads(), vec!["evt"]);
        assert!(broker.publish_to_topic("nobody", "evt").await.is_ok());
    }

    #[tokio::test]
    async fn unreachable_broker_fails_ping_and_publish() {
        let broker = broker();
        broker.set_reachable(false);
        assert!(matches!(broker.ping().await, Err(BrokerError::Unreachable(_))));
        assert!(broker.publish_to_topic("placed", "evt").await.is_err());
        assert!(broker.send("orders", "{}").is_err());
    }

    #[test]
    fn unknown_queue_is_rejected() {
        assert!(matches!(
            broker().send("missing", "{}"),
            Err(BrokerError::UnknownDestination(_))
        ));
    }
}
