//! Test event sinks.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::SinkError;
use crate::port::outbound::sink::EventSink;

/// Keeps every payload it receives.
pub struct RecordingSink {
    name: String,
    payloads: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn payloads(&self) -> Vec<String> {
        self.payloads.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.payloads.lock().len()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn publish(&self, payload: &str) -> Result<(), SinkError> {
        self.payloads.lock().push(payload.to_string());
        Ok(())
    }
}

/// Rejects every publish and counts the attempts.
pub struct FailingSink {
    name: String,
    attempts: AtomicUsize,
}

impl FailingSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventSink for FailingSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn publish(&self, _payload: &str) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SinkError::new(&self.name, "sink unreachable"))
    }
}

/// Sleeps before recording each payload.
pub struct SlowSink {
    delay: Duration,
    inner: RecordingSink,
}

impl SlowSink {
    pub fn new(name: impl Into<String>, delay: Duration) -> Self {
        Self {
            delay,
            inner: RecordingSink::new(name),
        }
    }

    pub fn count(&self) -> usize {
        self.inner.count()
    }
}

#[async_trait]
impl EventSink for SlowSink {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn publish(&self, payload: &str) -> Result<(), SinkError> {
        tokio::time::sleep(self.delay).await;
        self.inner.publish(payload).await
    }
}
