//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use tracing::info;

use crate::adapter::inbound::broker::consumer::Consumer;
use crate::adapter::inbound::broker::exchange::RejectPolicy;
use crate::adapter::outbound::sink::exchange::ExchangeSink;
use crate::adapter::outbound::sink::log::LogSink;
use crate::adapter::outbound::sink::topic::TopicSink;
use crate::adapter::outbound::sqlite::database::connection;
use crate::adapter::outbound::sqlite::store::SqliteOrderStore;
use crate::application::event::producer::EventProducer;
use crate::application::pipeline::OrderPipeline;
use crate::application::processor::persistence::OrderPersistence;
use crate::application::processor::registry::ProcessorRegistry;
use crate::application::status::OrderStatusService;
use crate::application::validation::chain::ValidatorChain;
use crate::error::{ConfigError, Result};
use crate::infrastructure::broker::exchange::{ExchangeBroker, QueueArgs};
use crate::infrastructure::broker::topic::TopicBroker;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::broker::BrokerProbe;
use crate::port::outbound::sink::EventSink;
use crate::port::outbound::store::OrderStore;

/// Health label of the queue/topic broker.
pub const TOPIC_BROKER_NAME: &str = "topic-broker";
/// Health label of the exchange broker.
pub const EXCHANGE_BROKER_NAME: &str = "exchange-broker";

/// Everything a running process needs, wired from one [`Config`].
pub struct Services {
    pub config: Config,
    pub store: Arc<dyn OrderStore>,
    pub topic_broker: Arc<TopicBroker>,
    pub exchange_broker: Arc<ExchangeBroker>,
    pub pipeline: Arc<OrderPipeline>,
    pub status: Arc<OrderStatusService>,
}

impl Services {
    /// Open the database and build the full graph.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated, or the
    /// broker topology cannot be declared.
    #[allow(clippy::result_large_err)]
    pub fn build(config: Config) -> Result<Self> {
        let store = open_store(&config)?;
        Self::with_store(config, store)
    }

    /// Build the graph over an existing store.
    ///
    /// # Errors
    ///
    /// Returns an error if the broker topology cannot be declared or the
    /// validation config is invalid.
    #[allow(clippy::result_large_err)]
    pub fn with_store(config: Config, store: Arc<dyn OrderStore>) -> Result<Self> {
        let topic_broker = build_topic_broker(&config);
        let exchange_broker = build_exchange_broker(&config)?;
        let sinks: Vec<Arc<dyn EventSink>> = vec![
            Arc::new(TopicSink::new(
                "topic",
                topic_broker.clone(),
                config.topic_broker.event_topic.clone(),
            )),
            Arc::new(ExchangeSink::new(
                "exchange",
                exchange_broker.clone(),
                config.exchange_broker.event_exchange.clone(),
                config.exchange_broker.event_routing_key.clone(),
            )),
            Arc::new(LogSink),
        ];
        let pipeline = Arc::new(build_pipeline(&config, Arc::clone(&store), sinks)?);
        let status = Arc::new(OrderStatusService::new(Arc::clone(&store)));

        Ok(Self {
            config,
            store,
            topic_broker,
            exchange_broker,
            pipeline,
            status,
        })
    }

    /// Broker probes, in report order.
    #[must_use]
    pub fn broker_probes(&self) -> Vec<Arc<dyn BrokerProbe>> {
        vec![
            Arc::clone(&self.topic_broker) as Arc<dyn BrokerProbe>,
            Arc::clone(&self.exchange_broker) as Arc<dyn BrokerProbe>,
        ]
    }

    /// Consumers for every enabled broker.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured placement queue is undeclared.
    #[allow(clippy::result_large_err)]
    pub fn consumers(&self) -> Result<Vec<Consumer>> {
        let mut consumers = Vec::new();
        let topic = &self.config.topic_broker;
        if topic.enabled {
            let source = self.topic_broker.consumer(&topic.placement_queue)?;
            consumers.push(Consumer::new(
                Arc::new(source),
                self.pipeline.clone(),
                Arc::new(topic.policy()),
                topic.consumer_settings(),
            ));
        }
        let exchange = &self.config.exchange_broker;
        if exchange.enabled {
            let source = self.exchange_broker.consumer(&exchange.placement_queue)?;
            consumers.push(Consumer::new(
                Arc::new(source),
                self.pipeline.clone(),
                Arc::new(RejectPolicy),
                exchange.consumer_settings(),
            ));
        }
        Ok(consumers)
    }
}

/// Freshly declared brokers, without a store.
///
/// # Errors
///
/// Returns an error if the exchange topology cannot be declared.
#[allow(clippy::result_large_err)]
pub fn broker_probes(config: &Config) -> Result<Vec<Arc<dyn BrokerProbe>>> {
    Ok(vec![
        build_topic_broker(config) as Arc<dyn BrokerProbe>,
        build_exchange_broker(config)? as Arc<dyn BrokerProbe>,
    ])
}

/// Open (and migrate) the SQLite store.
#[allow(clippy::result_large_err)]
pub fn open_store(config: &Config) -> Result<Arc<dyn OrderStore>> {
    let pool = connection::open(&config.database, &config.storage)?;
    info!(database = %config.database, "Database initialized");
    Ok(Arc::new(SqliteOrderStore::new(pool)))
}

/// Declare the placement queue, its DLQ, and nothing else. Event topic
/// subscribers attach themselves.
pub fn build_topic_broker(config: &Config) -> Arc<TopicBroker> {
    let settings = &config.topic_broker;
    let broker = TopicBroker::new(TOPIC_BROKER_NAME);
    broker.declare_queue(&settings.placement_queue, &settings.dead_letter_queue);
    info!(
        queue = %settings.placement_queue,
        dead_letter_queue = %settings.dead_letter_queue,
        "Topic broker ready"
    );
    Arc::new(broker)
}

/// Main exchange with the placement queue bound by routing key, the
/// dead-letter exchange and queue, the health-check queue, and a bounded
/// event queue bound to the event routing key.
#[allow(clippy::result_large_err)]
pub fn build_exchange_broker(config: &Config) -> Result<Arc<ExchangeBroker>> {
    let settings = &config.exchange_broker;
    let broker =
        ExchangeBroker::with_health_check_queue(EXCHANGE_BROKER_NAME, &settings.health_check_queue);

    broker.declare_exchange(&settings.exchange);
    broker.declare_exchange(&settings.dead_letter_exchange);
    broker.declare_exchange(&settings.event_exchange);

    broker.declare_queue(
        &settings.placement_queue,
        QueueArgs::dead_letter(
            settings.dead_letter_exchange.clone(),
            settings.dead_letter_routing_key.clone(),
        ),
    );
    broker.bind(
        &settings.placement_queue,
        &settings.exchange,
        &settings.placement_routing_key,
    )?;

    broker.declare_queue(&settings.dead_letter_queue, QueueArgs::default());
    broker.bind(
        &settings.dead_letter_queue,
        &settings.dead_letter_exchange,
        &settings.dead_letter_routing_key,
    )?;

    broker.declare_queue(
        &settings.event_queue,
        QueueArgs::bounded(settings.event_queue_max_length),
    );
    broker.bind(
        &settings.event_queue,
        &settings.event_exchange,
        &settings.event_routing_key,
    )?;

    info!(
        exchange = %settings.exchange,
        queue = %settings.placement_queue,
        dead_letter_exchange = %settings.dead_letter_exchange,
        "Exchange broker ready"
    );
    Ok(Arc::new(broker))
}

/// Validator chain, processor registry and producer over `store`.
#[allow(clippy::result_large_err)]
pub fn build_pipeline(
    config: &Config,
    store: Arc<dyn OrderStore>,
    sinks: Vec<Arc<dyn EventSink>>,
) -> Result<OrderPipeline> {
    let validator =
        ValidatorChain::from_config(&config.validation).map_err(|e| ConfigError::InvalidValue {
            field: "phone_pattern",
            reason: e.to_string(),
        })?;

    let persistence = OrderPersistence::new(store);
    let processors = ProcessorRegistry::from_config(&config.processors, &persistence);

    let mut producer = EventProducer::new(config.publisher.clone());
    for sink in sinks {
        producer.register(sink);
    }

    info!(
        validators = validator.len(),
        processors = ?processors.supported_types(),
        sinks = ?producer.sink_names(),
        "Pipeline initialized"
    );
    Ok(OrderPipeline::new(validator, processors, producer))
}
