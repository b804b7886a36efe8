//! Shared persistence path used by every processor variant.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::order::{OrderRequest, OrderType, PersistedOrder};
use crate::error::PlacementError;
use crate::port::outbound::store::OrderStore;

/// Saves customer, address and order, in that order.
///
/// Customer and address rows get fresh ids on every call. If the order write
/// then fails as a duplicate, those two rows are left behind.
#[derive(Clone)]
pub struct OrderPersistence {
    store: Arc<dyn OrderStore>,
}

impl OrderPersistence {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    pub async fn save(
        &self,
        request: &OrderRequest,
        order_type: OrderType,
    ) -> Result<PersistedOrder, PlacementError> {
        let customer_id = self.store.save_customer(&request.customer_details).await?;
        let address_id = self.store.save_address(&request.customer_address).await?;
        debug!(
            order_id = %request.id,
            customer_id = %customer_id,
            address_id = %address_id,
            "Saved customer and address"
        );

        let order = self
            .store
            .save_order(request, order_type, customer_id, address_id)
            .await?;
        info!(
            order_id = %order.id,
            order_type = %order.order_type,
            items = order.items.len(),
            "Order persisted"
        );
        Ok(order)
    }
}
