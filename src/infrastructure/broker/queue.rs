//! Async FIFO queue of deliveries.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;
use tracing::debug;

use crate::port::outbound::broker::Delivery;

/// Named queue. Receivers park on a [`Notify`] until a message arrives or the
/// queue is closed.
///
/// A bounded queue drops its oldest message to make room for a new one.
#[derive(Debug)]
pub struct MessageQueue {
    name: String,
    messages: Mutex<VecDeque<Delivery>>,
    max_length: Option<usize>,
    notify: Notify,
    closed: AtomicBool,
}

impl MessageQueue {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_max_length(name, None)
    }

    pub fn with_max_length(name: impl Into<String>, max_length: Option<usize>) -> Self {
        Self {
            name: name.into(),
            messages: Mutex::new(VecDeque::new()),
            max_length: max_length.map(|max| max.max(1)),
            notify: Notify::new(),
            closed: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a delivery and wake one receiver.
    pub fn push(&self, delivery: Delivery) {
        let dropped = {
            let mut messages = self.messages.lock();
            let dropped = match self.max_length {
                Some(max) if messages.len() >= max => messages.pop_front(),
                _ => None,
            };
            messages.push_back(delivery);
            dropped
        };
        if let Some(dropped) = dropped {
            debug!(queue = %self.name, message_id = %dropped.id, "Queue full, oldest message dropped");
        }
        self.notify.notify_one();
    }

    /// Take the head without waiting.
    pub fn try_pop(&self) -> Option<Delivery> {
        self.messages.lock().pop_front()
    }

    /// Wait for the next delivery. Returns `None` once closed and empty.
    ///
    /// Cancel-safe: a message is only removed when this future completes.
    pub async fn pop(&self) -> Option<Delivery> {
        loop {
            let notified = self.notify.notified();
            if let Some(delivery) = self.try_pop() {
                return Some(delivery);
            }
            if self.closed.load(Ordering::Acquire) {
                return None;
            }
            notified.await;
        }
    }

    /// Stop accepting waits; pending messages can still be drained.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    /// Payloads currently queued, head first.
    #[must_use]
    pub fn payloads(&self) -> Vec<String> {
        self.messages
            .lock()
            .iter()
            .map(|delivery| delivery.payload.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn pop_waits_for_push() {
        let queue = Arc::new(MessageQueue::new("q"));
        let waiter = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.pop().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.push(Delivery::new("hello"));

        let delivery = waiter.await.unwrap().unwrap();
        assert_eq!(delivery.payload, "hello");
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn close_releases_waiters() {
        let queue = Arc::new(MessageQueue::new("q"));
        let waiter = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.pop().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.close();
        assert!(waiter.await.unwrap().is_none());
    }

    #[tokio::test]
    async fn closed_queue_still_drains() {
        let queue = MessageQueue::new("q");
        queue.push(Delivery::new("a"));
        queue.close();
        assert_eq!(queue.pop().await.unwrap().payload, "a");
        assert!(queue.pop().await.is_none());
    }

    #[test]
    fn fifo_order() {
        let queue = MessageQueue::new("q");
        queue.push(Delivery::new("1"));
        queue.push(Delivery::new("2"));
        assert_eq!(queue.payloads(), vec!["1", "2"]);
    }

    #[test]
    fn bounded_queue_drops_oldest() {
        let queue = MessageQueue::with_max_length("events", Some(2));
        for payload in ["1", "2", "3"] {
            queue.push(Delivery::new(payload));
        }
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.payloads(), vec!["2", "3"]);
    }
}
