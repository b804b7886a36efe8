//! Fully wired pipeline for tests.

use std::sync::Arc;

use crate::application::event::producer::EventProducer;
use crate::application::pipeline::OrderPipeline;
use crate::application::processor::config::ProcessorConfig;
use crate::application::processor::persistence::OrderPersistence;
use crate::application::processor::registry::ProcessorRegistry;
use crate::application::validation::chain::ValidatorChain;
use crate::application::validation::config::ValidationConfig;
use crate::port::outbound::sink::EventSink;
use crate::port::outbound::store::OrderStore;

/// Standard validators and default processors, no sink retries.
pub fn build(store: Arc<dyn OrderStore>, sinks: Vec<Arc<dyn EventSink>>) -> OrderPipeline {
    build_with_validation(store, sinks, &ValidationConfig::default())
}

/// [`build`] with a custom validator chain.
pub fn build_with_validation(
    store: Arc<dyn OrderStore>,
    sinks: Vec<Arc<dyn EventSink>>,
    validation: &ValidationConfig,
) -> OrderPipeline {
    let persistence = OrderPersistence::new(store);
    let processors = ProcessorRegistry::from_config(&ProcessorConfig::default(), &persistence);
    let mut producer = EventProducer::new(super::config::producer());
    for sink in sinks {
        producer.register(sink);
    }
    let validator = ValidatorChain::from_config(validation).expect("phone pattern compiles");
    OrderPipeline::new(validator, processors, producer)
}
