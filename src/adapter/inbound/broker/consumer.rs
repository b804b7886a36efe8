//! Broker consumer loop.
//!
//! Each delivery is decoded, handed to [`OrderIntake`], and settled according
//! to a [`DeliveryPolicy`]. Deliveries run concurrently up to a bound; on
//! shutdown the loop stops receiving and waits for in-flight work. A delivery
//! whose processing panics is still settled, through
//! [`DeliveryPolicy::on_panic`].

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use tokio::sync::{watch, Semaphore};
use tracing::{debug, error, info, warn};

use crate::domain::order::OrderRequest;
use crate::error::PlacementError;
use crate::port::inbound::intake::OrderIntake;
use crate::port::outbound::broker::{Delivery, Disposition, MessageSource};

/// Maps a failed delivery to a disposition.
pub trait DeliveryPolicy: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Payload could not be decoded into an order request.
    fn on_malformed(&self, delivery: &Delivery, reason: &str) -> Disposition;

    /// Placement returned an error.
    fn on_failure(&self, delivery: &Delivery, error: &PlacementError) -> Disposition;

    /// Processing panicked. Replaying the payload would panic again.
    fn on_panic(&self, _delivery: &Delivery, reason: &str) -> Disposition {
        Disposition::DeadLetter {
            reason: reason.to_string(),
        }
    }
}

/// Consumer tuning.
#[derive(Debug, Clone, Copy)]
pub struct ConsumerSettings {
    pub concurrency: usize,
    pub processing_timeout: Duration,
}

impl Default for ConsumerSettings {
    fn default() -> Self {
        Self {
            concurrency: 4,
            processing_timeout: Duration::from_secs(30),
        }
    }
}

/// Running totals, readable while the consumer runs.
#[derive(Debug, Default)]
pub struct ConsumerStats {
    received: AtomicU64,
    acked: AtomicU64,
    redelivered: AtomicU64,
    dead_lettered: AtomicU64,
}

impl ConsumerStats {
    #[must_use]
    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn acked(&self) -> u64 {
        self.acked.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn redelivered(&self) -> u64 {
        self.redelivered.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn dead_lettered(&self) -> u64 {
        self.dead_lettered.load(Ordering::Relaxed)
    }

    /// Deliveries whose settlement has completed.
    #[must_use]
    pub fn settled(&self) -> u64 {
        self.acked() + self.redelivered() + self.dead_lettered()
    }

    fn record(&self, disposition: &Disposition) {
        let counter = match disposition {
            Disposition::Ack => &self.acked,
            Disposition::Redeliver | Disposition::Reject { requeue: true } => &self.redelivered,
            Disposition::DeadLetter { .. } | Disposition::Reject { requeue: false } => {
                &self.dead_lettered
            }
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Consumer bound to one queue.
pub struct Consumer {
    source: Arc<dyn MessageSource>,
    intake: Arc<dyn OrderIntake>,
    policy: Arc<dyn DeliveryPolicy>,
    settings: ConsumerSettings,
    stats: Arc<ConsumerStats>,
}

impl Consumer {
    pub fn new(
        source: Arc<dyn MessageSource>,
        intake: Arc<dyn OrderIntake>,
        policy: Arc<dyn DeliveryPolicy>,
        settings: ConsumerSettings,
    ) -> Self {
        Self {
            source,
            intake,
            policy,
            settings,
            stats: Arc::new(ConsumerStats::default()),
        }
    }

    #[must_use]
    pub fn queue(&self) -> &str {
        self.source.queue()
    }

    #[must_use]
    pub fn stats(&self) -> Arc<ConsumerStats> {
        Arc::clone(&self.stats)
    }

    /// Decide the disposition for one delivery. Does not settle it.
    pub async fn handle(&self, delivery: &Delivery) -> Disposition {
        settle_panics(
            self.policy.as_ref(),
            delivery,
            handle_delivery(
                self.intake.as_ref(),
                self.policy.as_ref(),
                self.settings.processing_timeout,
                delivery,
            ),
        )
        .await
    }

    /// Receive and settle until shutdown or until the source closes.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let concurrency = self.settings.concurrency.max(1);
        let permits = Arc::new(Semaphore::new(concurrency));
        let queue = self.source.queue().to_string();
        info!(queue = %queue, policy = self.policy.name(), concurrency, "Consumer started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            let permit = tokio::select! {
                permit = Arc::clone(&permits).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            };

            let delivery = tokio::select! {
                delivery = self.source.receive() => delivery,
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            };
            let Some(delivery) = delivery else {
                debug!(queue = %queue, "Source closed");
                break;
            };

            self.stats.received.fetch_add(1, Ordering::Relaxed);
            let source = Arc::clone(&self.source);
            let intake = Arc::clone(&self.intake);
            let policy = Arc::clone(&self.policy);
            let stats = Arc::clone(&self.stats);
            let timeout = self.settings.processing_timeout;
            tokio::spawn(async move {
                let _permit = permit;
                let disposition = settle_panics(
                    policy.as_ref(),
                    &delivery,
                    handle_delivery(intake.as_ref(), policy.as_ref(), timeout, &delivery),
                )
                .await;
                let message_id = delivery.id;
                if let Err(e) = source.settle(delivery, disposition.clone()).await {
                    error!(queue = source.queue(), %message_id, error = %e, "Failed to settle delivery");
                }
                stats.record(&disposition);
            });
        }

        // Wait for in-flight deliveries.
        let _ = permits.acquire_many(concurrency as u32).await;
        info!(
            queue = %queue,
            received = self.stats.received(),
            acked = self.stats.acked(),
            dead_lettered = self.stats.dead_lettered(),
            "Consumer stopped"
        );
    }
}

/// Dead-letter the delivery if deciding its disposition panicked.
async fn settle_panics(
    policy: &dyn DeliveryPolicy,
    delivery: &Delivery,
    decide: impl Future<Output = Disposition>,
) -> Disposition {
    match AssertUnwindSafe(decide).catch_unwind().await {
        Ok(disposition) => disposition,
        Err(panic) => {
            let reason = panic_reason(panic.as_ref());
            let disposition = policy.on_panic(delivery, &reason);
            log_failure(delivery, &reason, &disposition);
            disposition
        }
    }
}

fn panic_reason(panic: &(dyn Any + Send)) -> String {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("processing panicked: {detail}")
}

async fn handle_delivery(
    intake: &dyn OrderIntake,
    policy: &dyn DeliveryPolicy,
    timeout: Duration,
    delivery: &Delivery,
) -> Disposition {
    let request: OrderRequest = match serde_json::from_str(&delivery.payload) {
        Ok(request) => request,
        Err(e) => {
            let reason = e.to_string();
            let disposition = policy.on_malformed(delivery, &reason);
            log_failure(delivery, &reason, &disposition);
            return disposition;
        }
    };
    let order_id = request.id;

    match intake.process_within(request, timeout).await {
        Ok(receipt) => {
            for failure in &receipt.publish.failures {
                warn!(%order_id, sink = %failure.sink, reason = %failure.reason, "Order stored but event not published");
            }
            debug!(%order_id, message_id = %delivery.id, "Delivery processed");
            Disposition::Ack
        }
        Err(e) => {
            let disposition = policy.on_failure(delivery, &e);
            log_failure(delivery, &e.to_string(), &disposition);
            disposition
        }
    }
}

fn log_failure(delivery: &Delivery, reason: &str, disposition: &Disposition) {
    if disposition.is_dead_letter() {
        error!(
            message_id = %delivery.id,
            attempt = delivery.attempt,
            payload = %delivery.payload,
            reason,
            "Message dead-lettered"
        );
    } else {
        warn!(
            message_id = %delivery.id,
            attempt = delivery.attempt,
            reason,
            ?disposition,
            "Delivery failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::inbound::broker::topic::TopicRedeliveryPolicy;
    use crate::testkit::intake::ScriptedIntake;

    fn consumer(intake: Arc<ScriptedIntake>) -> Consumer {
        let source = Arc::new(crate::testkit::broker::VecSource::new(Vec::new()));
        Consumer::new(
            source,
            intake,
            Arc::new(TopicRedeliveryPolicy::default()),
            ConsumerSettings::default(),
        )
    }

    #[tokio::test]
    async fn malformed_payload_is_dead_lettered() {
        let consumer = consumer(Arc::new(ScriptedIntake::succeeding()));
        let disposition = consumer.handle(&Delivery::new("not json")).await;
        assert!(disposition.is_dead_letter());
    }

    #[tokio::test]
    async fn success_is_acked() {
        let consumer = consumer(Arc::new(ScriptedIntake::succeeding()));
        let payload = serde_json::to_string(&crate::testkit::domain::valid_request()).unwrap();
        assert_eq!(consumer.handle(&Delivery::new(payload)).await, Disposition::Ack);
    }

    #[tokio::test]
    async fn slow_intake_times_out_as_transient() {
        let intake = Arc::new(ScriptedIntake::stalling(Duration::from_millis(200)));
        let consumer = Consumer::new(
            Arc::new(crate::testkit::broker::VecSource::new(Vec::new())),
            intake,
            Arc::new(TopicRedeliveryPolicy::default()),
            ConsumerSettings {
                concurrency: 1,
                processing_timeout: Duration::from_millis(20),
            },
        );
        let payload = serde_json::to_string(&crate::testkit::domain::valid_request()).unwrap();
        assert_eq!(
            consumer.handle(&Delivery::new(payload)).await,
            Disposition::Redeliver
        );
    }

    #[tokio::test]
    async fn panicking_intake_is_dead_lettered() {
        let consumer = consumer(Arc::new(ScriptedIntake::panicking()));
        let payload = serde_json::to_string(&crate::testkit::domain::valid_request()).unwrap();
        match consumer.handle(&Delivery::new(payload)).await {
            Disposition::DeadLetter { reason } => {
                assert!(reason.contains("processing panicked"), "{reason}");
                assert!(reason.contains("scripted panic"), "{reason}");
            }
            other => panic!("expected dead letter, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn overflowing_total_is_settled_by_run() {
        use crate::application::validation::config::ValidationConfig;
        use crate::port::outbound::sink::EventSink;

        let validation = ValidationConfig {
            enforce_total_amount: true,
            ..ValidationConfig::default()
        };
        let sinks: Vec<Arc<dyn EventSink>> = Vec::new();
        let pipeline = crate::testkit::pipeline::build_with_validation(
            crate::testkit::store::memory(),
            sinks,
            &validation,
        );

        let payload = r#"{"id":1234567,"orderType":"ONLINE",
            "customerDetails":{"name":"John Doe","email":"john.doe@example.com","phone":"+1234567890"},
            "items":[{"productId":1,"quantity":100,"pricePerUnit":"50000000000000000000000000000"}],
            "totalAmount":1,"currency":"USD"}"#;
        let source = Arc::new(crate::testkit::broker::VecSource::new(vec![Delivery::new(payload)]));
        let consumer = Consumer::new(
            source.clone(),
            Arc::new(pipeline),
            Arc::new(TopicRedeliveryPolicy::default()),
            ConsumerSettings::default(),
        );
        let stats = consumer.stats();

        let (_tx, rx) = watch::channel(false);
        tokio::time::timeout(Duration::from_secs(5), consumer.run(rx))
            .await
            .unwrap();

        assert_eq!(stats.received(), 1);
        assert_eq!(stats.settled(), 1);
        let settled = source.settled();
        assert_eq!(settled.len(), 1);
        assert_eq!(
            settled[0].1,
            Disposition::DeadLetter {
                reason: "Order total overflows".into()
            }
        );
    }

    #[tokio::test]
    async fn slow_sink_after_commit_is_still_acked() {
        use crate::port::outbound::sink::EventSink;
        use crate::testkit::sink::SlowSink;

        let store = crate::testkit::store::memory_concrete();
        let slow = Arc::new(SlowSink::new("slow", Duration::from_millis(300)));
        let sinks: Vec<Arc<dyn EventSink>> = vec![slow.clone()];
        let pipeline = crate::testkit::pipeline::build(store.clone(), sinks);
        let consumer = Consumer::new(
            Arc::new(crate::testkit::broker::VecSource::new(Vec::new())),
            Arc::new(pipeline),
            Arc::new(TopicRedeliveryPolicy::default()),
            ConsumerSettings {
                concurrency: 1,
                processing_timeout: Duration::from_millis(100),
            },
        );

        let payload = serde_json::to_string(&crate::testkit::domain::valid_request()).unwrap();
        assert_eq!(consumer.handle(&Delivery::new(payload)).await, Disposition::Ack);
        assert_eq!(store.order_count(), 1);
        assert_eq!(slow.count(), 1);
    }
}
