//! Broker topology and consumer settings.

use std::time::Duration;

use serde::Deserialize;

use crate::adapter::inbound::broker::consumer::ConsumerSettings;
use crate::adapter::inbound::broker::topic::{TopicRedeliveryPolicy, DEFAULT_MAX_REDELIVERIES};

/// Queue/topic broker (broker A).
#[derive(Debug, Clone, Deserialize)]
pub struct TopicBrokerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Queue the placement consumer reads.
    #[serde(default = "default_topic_placement_queue")]
    pub placement_queue: String,

    /// Where exhausted or unprocessable messages go.
    #[serde(default = "default_topic_dead_letter_queue")]
    pub dead_letter_queue: String,

    /// Redeliveries after the first attempt for transient failures.
    #[serde(default = "default_max_redeliveries")]
    pub max_redeliveries: u32,

    /// Give permanent failures the same redelivery budget as transient ones.
    #[serde(default)]
    pub retry_permanent_errors: bool,

    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default = "default_processing_timeout_ms")]
    pub processing_timeout_ms: u64,

    /// Topic receiving placement events.
    #[serde(default = "default_event_topic")]
    pub event_topic: String,
}

fn default_topic_placement_queue() -> String {
    "order.placement".into()
}

fn default_topic_dead_letter_queue() -> String {
    "order.placement.dlq".into()
}

const fn default_max_redeliveries() -> u32 {
    DEFAULT_MAX_REDELIVERIES
}

fn default_event_topic() -> String {
    "order.placed".into()
}

impl Default for TopicBrokerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            placement_queue: default_topic_placement_queue(),
            dead_letter_queue: default_topic_dead_letter_queue(),
            max_redeliveries: default_max_redeliveries(),
            retry_permanent_errors: false,
            concurrency: default_concurrency(),
            processing_timeout_ms: default_processing_timeout_ms(),
            event_topic: default_event_topic(),
        }
    }
}

impl TopicBrokerConfig {
    #[must_use]
    pub fn policy(&self) -> TopicRedeliveryPolicy {
        TopicRedeliveryPolicy {
            max_redeliveries: self.max_redeliveries,
            retry_permanent_errors: self.retry_permanent_errors,
        }
    }

    #[must_use]
    pub fn consumer_settings(&self) -> ConsumerSettings {
        ConsumerSettings {
            concurrency: self.concurrency,
            processing_timeout: Duration::from_millis(self.processing_timeout_ms),
        }
    }
}

/// Exchange/queue broker (broker B).
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeBrokerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_exchange")]
    pub exchange: String,

    #[serde(default = "default_exchange_placement_queue")]
    pub placement_queue: String,

    #[serde(default = "default_placement_routing_key")]
    pub placement_routing_key: String,

    #[serde(default = "default_dead_letter_exchange")]
    pub dead_letter_exchange: String,

    #[serde(default = "default_exchange_dead_letter_queue")]
    pub dead_letter_queue: String,

    #[serde(default = "default_dead_letter_routing_key")]
    pub dead_letter_routing_key: String,

    #[serde(default = "default_health_check_queue")]
    pub health_check_queue: String,

    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default = "default_processing_timeout_ms")]
    pub processing_timeout_ms: u64,

    /// Exchange and routing key receiving placement events.
    #[serde(default = "default_exchange")]
    pub event_exchange: String,

    #[serde(default = "default_event_routing_key")]
    pub event_routing_key: String,

    /// Queue bound to the event routing key so published events are retained.
    #[serde(default = "default_event_queue")]
    pub event_queue: String,

    /// Events retained on `event_queue`; older ones are dropped.
    #[serde(default = "default_event_queue_max_length")]
    pub event_queue_max_length: usize,
}

fn default_exchange() -> String {
    "order.exchange".into()
}

fn default_exchange_placement_queue() -> String {
    "order.queue".into()
}

fn default_placement_routing_key() -> String {
    "order.routing.key".into()
}

fn default_dead_letter_exchange() -> String {
    "dlq.exchange".into()
}

fn default_exchange_dead_letter_queue() -> String {
    "dlq.queue".into()
}

fn default_dead_letter_routing_key() -> String {
    "dlq.routing.key".into()
}

fn default_health_check_queue() -> String {
    "healthcheck".into()
}

fn default_event_routing_key() -> String {
    "order.placed".into()
}

fn default_event_queue() -> String {
    "order.placed.queue".into()
}

const fn default_event_queue_max_length() -> usize {
    10_000
}

impl Default for ExchangeBrokerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            exchange: default_exchange(),
            placement_queue: default_exchange_placement_queue(),
            placement_routing_key: default_placement_routing_key(),
            dead_letter_exchange: default_dead_letter_exchange(),
            dead_letter_queue: default_exchange_dead_letter_queue(),
            dead_letter_routing_key: default_dead_letter_routing_key(),
            health_check_queue: default_health_check_queue(),
            concurrency: default_concurrency(),
            processing_timeout_ms: default_processing_timeout_ms(),
            event_exchange: default_exchange(),
            event_routing_key: default_event_routing_key(),
            event_queue: default_event_queue(),
            event_queue_max_length: default_event_queue_max_length(),
        }
    }
}

impl ExchangeBrokerConfig {
    #[must_use]
    pub fn consumer_settings(&self) -> ConsumerSettings {
        ConsumerSettings {
            concurrency: self.concurrency,
            processing_timeout: Duration::from_millis(self.processing_timeout_ms),
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_concurrency() -> usize {
    4
}

const fn default_processing_timeout_ms() -> u64 {
    30_000
}
