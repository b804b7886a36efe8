//! Concrete processor variants.

use async_trait::async_trait;
use tracing::info;

use crate::domain::order::{OrderRequest, OrderType, PersistedOrder};
use crate::error::PlacementError;

use super::persistence::OrderPersistence;
use super::registry::OrderProcessor;

/// Handles `ONLINE` orders.
pub struct OnlineOrderProcessor {
    persistence: OrderPersistence,
}

impl OnlineOrderProcessor {
    pub fn new(persistence: OrderPersistence) -> Self {
        Self { persistence }
    }
}

#[async_trait]
impl OrderProcessor for OnlineOrderProcessor {
    fn name(&self) -> &'static str {
        "online"
    }

    fn supports(&self, order_type: OrderType) -> bool {
        order_type == OrderType::Online
    }

    async fn process(&self, request: &OrderRequest) -> Result<PersistedOrder, PlacementError> {
        info!(order_id = %request.id, "Processing online order");
        self.persistence.save(request, OrderType::Online).await
    }
}

/// Handles `OFFLINE` orders.
pub struct OfflineOrderProcessor {
    persistence: OrderPersistence,
}

impl OfflineOrderProcessor {
    pub fn new(persistence: OrderPersistence) -> Self {
        Self { persistence }
    }
}

#[async_trait]
impl OrderProcessor for OfflineOrderProcessor {
    fn name(&self) -> &'static str {
        "offline"
    }

    fn supports(&self, order_type: OrderType) -> bool {
        order_type == OrderType::Offline
    }

    async fn process(&self, request: &OrderRequest) -> Result<PersistedOrder, PlacementError> {
        info!(order_id = %request.id, "Processing offline order");
        self.persistence.save(request, OrderType::Offline).await
    }
}
