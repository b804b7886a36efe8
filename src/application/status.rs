//! Order status lookups.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::id::OrderId;
use crate::domain::status::{OrderItemStatus, OrderStatusView};
use crate::error::StatusError;
use crate::port::inbound::status::OrderStatusQuery;
use crate::port::outbound::store::OrderStore;

/// Reads order type and item statuses from the store.
pub struct OrderStatusService {
    store: Arc<dyn OrderStore>,
}

impl OrderStatusService {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl OrderStatusQuery for OrderStatusService {
    async fn order_status(&self, order_id: OrderId) -> Result<OrderStatusView, StatusError> {
        let order = self
            .store
            .find_order(order_id)
            .await?
            .ok_or(StatusError::OrderNotFound(order_id))?;

        if order.items.is_empty() {
            return Err(StatusError::ItemsNotFound(order_id));
        }

        debug!(order_id = %order_id, items = order.items.len(), "Order status loaded");

        Ok(OrderStatusView {
            order_id: order.id,
            order_type: order.order_type,
            items: order
                .items
                .into_iter()
                .map(|item| OrderItemStatus {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    status: item.status,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{CustomerAddress, CustomerDetails, OrderRequest, OrderType};
    use crate::testkit;

    async fn store_with(request: &OrderRequest) -> Arc<dyn OrderStore> {
        let store = testkit::store::memory();
        let customer = store.save_customer(&CustomerDetails::default()).await.unwrap();
        let address = store.save_address(&CustomerAddress::default()).await.unwrap();
        store
            .save_order(request, OrderType::Online, customer, address)
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let service = OrderStatusService::new(testkit::store::memory());
        let err = service.order_status(OrderId::new(9)).await.unwrap_err();
        assert!(matches!(err, StatusError::OrderNotFound(id) if id == OrderId::new(9)));
        assert_eq!(err.to_string(), "Order not found with id: 9");
    }

    #[tokio::test]
    async fn order_without_items_is_not_found() {
        let request = OrderRequest {
            id: OrderId::new(10),
            order_type: "ONLINE".into(),
            ..OrderRequest::default()
        };
        let service = OrderStatusService::new(store_with(&request).await);
        let err = service.order_status(OrderId::new(10)).await.unwrap_err();
        assert!(matches!(err, StatusError::ItemsNotFound(_)));
        assert!(err.is_not_found());
    }
}
