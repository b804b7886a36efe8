//! Order type → processor registry.
//!
//! Each [`OrderProcessor`] claims the order types it supports. Selection is a
//! map lookup; a valid type with no claimant is a deployment gap and fails
//! with [`PlacementError::UnsupportedOrderType`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::order::{OrderRequest, OrderType, PersistedOrder};
use crate::error::PlacementError;

use super::config::ProcessorConfig;
use super::persistence::OrderPersistence;
use super::variant::{OfflineOrderProcessor, OnlineOrderProcessor};

/// Type-specific handling for a placed order.
///
/// `process` may perform type-specific side effects but must persist through
/// [`OrderPersistence`].
#[async_trait]
pub trait OrderProcessor: Send + Sync {
    fn name(&self) -> &'static str;

    fn supports(&self, order_type: OrderType) -> bool;

    async fn process(&self, request: &OrderRequest) -> Result<PersistedOrder, PlacementError>;
}

/// Order type → processor map.
#[derive(Default)]
pub struct ProcessorRegistry {
    processors: HashMap<OrderType, Arc<dyn OrderProcessor>>,
}

impl ProcessorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in variants named in `config`.
    ///
    /// Types without a built-in variant (`IN_STORE`) are skipped with a warning.
    pub fn from_config(config: &ProcessorConfig, persistence: &OrderPersistence) -> Self {
        let mut registry = Self::new();
        for order_type in &config.enabled {
            match order_type {
                OrderType::Online => {
                    registry.register(Arc::new(OnlineOrderProcessor::new(persistence.clone())));
                }
                OrderType::Offline => {
                    registry.register(Arc::new(OfflineOrderProcessor::new(persistence.clone())));
                }
                OrderType::InStore => {
                    warn!(order_type = %order_type, "No processor variant available");
                }
            }
        }
        registry
    }

    /// Register a processor for every type it supports.
    ///
    /// Types already claimed by an earlier registration keep their processor.
    pub fn register(&mut self, processor: Arc<dyn OrderProcessor>) {
        for order_type in OrderType::ALL {
            if !processor.supports(order_type) || self.processors.contains_key(&order_type) {
                continue;
            }
            debug!(
                order_type = %order_type,
                processor = processor.name(),
                "Registered order processor"
            );
            self.processors.insert(order_type, Arc::clone(&processor));
        }
    }

    /// Processor for `order_type`.
    pub fn resolve(&self, order_type: OrderType) -> Result<&Arc<dyn OrderProcessor>, PlacementError> {
        self.processors
            .get(&order_type)
            .ok_or_else(|| PlacementError::UnsupportedOrderType {
                order_type: order_type.to_string(),
            })
    }

    /// Order types with a registered processor, in declaration order.
    #[must_use]
    pub fn supported_types(&self) -> Vec<OrderType> {
        OrderType::ALL
            .into_iter()
            .filter(|ty| self.processors.contains_key(ty))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit;

    struct CatchAll;

    #[async_trait]
    impl OrderProcessor for CatchAll {
        fn name(&self) -> &'static str {
            "catch_all"
        }

        fn supports(&self, _order_type: OrderType) -> bool {
            true
        }

        async fn process(&self, _request: &OrderRequest) -> Result<PersistedOrder, PlacementError> {
            Err(PlacementError::Infrastructure("unused".into()))
        }
    }

    fn persistence() -> OrderPersistence {
        OrderPersistence::new(testkit::store::memory())
    }

    #[test]
    fn default_config_covers_online_and_offline() {
        let registry = ProcessorRegistry::from_config(&ProcessorConfig::default(), &persistence());
        assert_eq!(
            registry.supported_types(),
            vec![OrderType::Online, OrderType::Offline]
        );
        assert_eq!(registry.resolve(OrderType::Online).unwrap().name(), "online");
        assert_eq!(registry.resolve(OrderType::Offline).unwrap().name(), "offline");
    }

    #[test]
    fn in_store_is_unsupported_by_default() {
        let registry = ProcessorRegistry::from_config(&ProcessorConfig::default(), &persistence());
        let err = registry.resolve(OrderType::InStore).err().unwrap();
        assert!(matches!(
            err,
            PlacementError::UnsupportedOrderType { ref order_type } if order_type == "IN_STORE"
        ));
        assert!(err.is_permanent());
    }

    #[test]
    fn first_registration_wins() {
        let mut registry = ProcessorRegistry::from_config(&ProcessorConfig::default(), &persistence());
        registry.register(Arc::new(CatchAll));
        assert_eq!(registry.resolve(OrderType::Online).unwrap().name(), "online");
        assert_eq!(registry.resolve(OrderType::InStore).unwrap().name(), "catch_all");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn disabled_types_are_not_registered() {
        let config = ProcessorConfig {
            enabled: vec![OrderType::Offline],
        };
        let registry = ProcessorRegistry::from_config(&config, &persistence());
        assert!(registry.resolve(OrderType::Online).is_err());
        assert!(registry.resolve(OrderType::Offline).is_ok());
    }
}
