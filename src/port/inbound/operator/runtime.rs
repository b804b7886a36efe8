//! Runtime control projection types for operator-facing adapters.

use async_trait::async_trait;

use crate::error::Result;

/// Broker that `run` feeds preloaded payloads into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeedTransport {
    /// Placement queue of the queue/topic broker.
    #[default]
    Topic,
    /// Main exchange of the exchange broker, under the placement routing key.
    Exchange,
}

/// Runtime configuration plus CLI overrides.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Raw TOML configuration content.
    pub config_toml: String,

    /// Override for log level.
    pub log_level: Option<String>,

    /// Whether to output logs as JSON.
    pub json_logs: bool,

    /// Override for the database path.
    pub database_path: Option<String>,

    /// Payloads enqueued once consumers are up.
    pub feed: Vec<String>,

    /// Where `feed` goes.
    pub feed_transport: FeedTransport,

    /// Stop once everything queued has been processed instead of waiting
    /// for Ctrl-C.
    pub drain: bool,
}

/// Per-consumer totals after `run` returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerReport {
    pub queue: String,
    pub received: u64,
    pub acked: u64,
    pub redelivered: u64,
    pub dead_lettered: u64,
}

/// What `run` did.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub consumers: Vec<ConsumerReport>,
    /// Payloads left on each dead-letter queue, keyed by queue name.
    pub dead_letters: Vec<(String, Vec<String>)>,
}

/// Runtime control use-cases for operator-facing adapters.
#[async_trait]
pub trait RuntimeOperator: Send + Sync {
    /// Start consumers and block until Ctrl-C, or until drained.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, storage or broker setup fails.
    async fn execute_run(&self, request: RunRequest) -> Result<RunReport>;
}
