//! Processor registration settings.

use serde::Deserialize;

use crate::domain::order::OrderType;

/// Which order types get a registered processor.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessorConfig {
    #[serde(default = "default_enabled")]
    pub enabled: Vec<OrderType>,
}

fn default_enabled() -> Vec<OrderType> {
    vec![OrderType::Online, OrderType::Offline]
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
        }
    }
}
