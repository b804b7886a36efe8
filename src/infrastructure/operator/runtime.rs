//! Runtime operator implementation.

use std::time::Duration;

use async_trait::async_trait;
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::Result;
use crate::infrastructure::bootstrap::Services;
use crate::infrastructure::orchestration::runtime;
use crate::port::inbound::operator::runtime::{
    FeedTransport, RunReport, RunRequest, RuntimeOperator,
};
use crate::port::outbound::broker::ExchangePublisher;

use super::{entry::Operator, shared};

const DRAIN_POLL: Duration = Duration::from_millis(50);

#[async_trait]
impl RuntimeOperator for Operator {
    async fn execute_run(&self, request: RunRequest) -> Result<RunReport> {
        let mut config = shared::load_config(&request.config_toml, request.database_path.as_deref())?;
        if let Some(level) = request.log_level.clone() {
            config.logging.level = level;
        }
        if request.json_logs {
            config.logging.format = "json".to_string();
        }
        config.init_logging();

        let services = Services::build(config)?;
        info!(
            database = %services.config.database,
            topic_queue = %services.config.topic_broker.placement_queue,
            exchange_queue = %services.config.exchange_broker.placement_queue,
            "ordergate starting"
        );

        feed(&services, &request).await?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let consumers = runtime::start(&services, &shutdown_rx)?;

        if request.drain {
            tokio::select! {
                () = runtime::wait_until_drained(&services, &consumers, DRAIN_POLL) => {
                    info!("Queues drained");
                }
                _ = signal::ctrl_c() => {
                    info!("Shutdown signal received (Ctrl+C)");
                }
            }
        } else {
            match signal::ctrl_c().await {
                Ok(()) => info!("Shutdown signal received (Ctrl+C)"),
                Err(e) => warn!(error = %e, "Failed to listen for Ctrl+C, shutting down"),
            }
        }

        let _ = shutdown_tx.send(true);
        let summaries = consumers.join().await;
        info!("ordergate stopped");

        let dead_letters = [
            (
                services.config.topic_broker.dead_letter_queue.clone(),
                services
                    .topic_broker
                    .queue(&services.config.topic_broker.dead_letter_queue),
            ),
            (
                services.config.exchange_broker.dead_letter_queue.clone(),
                services
                    .exchange_broker
                    .queue(&services.config.exchange_broker.dead_letter_queue),
            ),
        ]
        .into_iter()
        .map(|(name, queue)| (name, queue.map(|queue| queue.payloads()).unwrap_or_default()))
        .collect();

        Ok(RunReport {
            consumers: summaries.into_iter().map(shared::consumer_report).collect(),
            dead_letters,
        })
    }
}

#[allow(clippy::result_large_err)]
async fn feed(services: &Services, request: &RunRequest) -> Result<()> {
    let config = &services.config;
    for payload in &request.feed {
        match request.feed_transport {
            FeedTransport::Topic => services
                .topic_broker
                .send(&config.topic_broker.placement_queue, payload)?,
            FeedTransport::Exchange => {
                services
                    .exchange_broker
                    .publish_to_exchange(
                        &config.exchange_broker.exchange,
                        &config.exchange_broker.placement_routing_key,
                        payload,
                    )
                    .await?;
            }
        }
    }
    if !request.feed.is_empty() {
        info!(messages = request.feed.len(), transport = ?request.feed_transport, "Fed payloads");
    }
    Ok(())
}
