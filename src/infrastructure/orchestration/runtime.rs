//! Consumer supervision.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::adapter::inbound::broker::consumer::ConsumerStats;
use crate::error::Result;
use crate::infrastructure::bootstrap::Services;

/// Final counters of one consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerSummary {
    pub queue: String,
    pub received: u64,
    pub acked: u64,
    pub redelivered: u64,
    pub dead_lettered: u64,
}

struct ConsumerHandle {
    queue: String,
    stats: Arc<ConsumerStats>,
    task: JoinHandle<()>,
}

/// Spawned consumers.
pub struct RunningConsumers {
    handles: Vec<ConsumerHandle>,
}

impl RunningConsumers {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Every received delivery has been settled.
    pub fn is_settled(&self) -> bool {
        self.handles
            .iter()
            .all(|handle| handle.stats.received() == handle.stats.settled())
    }

    /// Wait for every consumer task to finish.
    pub async fn join(self) -> Vec<ConsumerSummary> {
        let mut summaries = Vec::with_capacity(self.handles.len());
        for handle in self.handles {
            if let Err(e) = handle.task.await {
                error!(queue = %handle.queue, error = %e, "Consumer task failed");
            }
            summaries.push(ConsumerSummary {
                queue: handle.queue,
                received: handle.stats.received(),
                acked: handle.stats.acked(),
                redelivered: handle.stats.redelivered(),
                dead_lettered: handle.stats.dead_lettered(),
            });
        }
        info!("All consumers stopped");
        summaries
    }
}

/// Spawn one task per enabled consumer. Each stops when `shutdown` flips to
/// `true` (or its sender is dropped) or its source closes, after finishing
/// in-flight deliveries.
#[allow(clippy::result_large_err)]
pub fn start(services: &Services, shutdown: &watch::Receiver<bool>) -> Result<RunningConsumers> {
    let consumers = services.consumers()?;
    info!(consumers = consumers.len(), "Starting consumers");

    let handles = consumers
        .into_iter()
        .map(|consumer| ConsumerHandle {
            queue: consumer.queue().to_string(),
            stats: consumer.stats(),
            task: tokio::spawn(consumer.run(shutdown.clone())),
        })
        .collect();
    Ok(RunningConsumers { handles })
}

/// [`start`] then [`RunningConsumers::join`].
pub async fn run_with_shutdown(
    services: &Services,
    shutdown: watch::Receiver<bool>,
) -> Result<Vec<ConsumerSummary>> {
    Ok(start(services, &shutdown)?.join().await)
}

/// Resolve once both placement queues are empty and every consumer has
/// settled what it received, observed on two consecutive polls.
pub async fn wait_until_drained(services: &Services, consumers: &RunningConsumers, poll: Duration) {
    let mut idle_polls = 0;
    loop {
        if placement_queues_empty(services) && consumers.is_settled() {
            idle_polls += 1;
            if idle_polls >= 2 {
                return;
            }
        } else {
            idle_polls = 0;
        }
        tokio::time::sleep(poll).await;
    }
}

fn placement_queues_empty(services: &Services) -> bool {
    let topic = services
        .topic_broker
        .queue(&services.config.topic_broker.placement_queue)
        .map_or(true, |queue| queue.is_empty());
    let exchange = services
        .exchange_broker
        .queue(&services.config.exchange_broker.placement_queue)
        .map_or(true, |queue| queue.is_empty());
    topic && exchange
}
