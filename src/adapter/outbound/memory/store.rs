//! Process-local [`OrderStore`] for tests and dry runs.
//!
//! Duplicate detection goes through the map's entry API so concurrent saves of
//! the same id race on a single shard lock, the way a primary key would.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;

use crate::domain::id::{AddressId, CustomerId, OrderId};
use crate::domain::order::{
    CustomerAddress, CustomerDetails, OrderItem, OrderRequest, OrderType, PersistedOrder,
};
use crate::error::StoreError;
use crate::port::outbound::store::OrderStore;

/// In-memory store keyed by order id.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: DashMap<OrderId, PersistedOrder>,
    customers: RwLock<HashMap<CustomerId, CustomerDetails>>,
    addresses: RwLock<HashMap<AddressId, CustomerAddress>>,
    next_customer: AtomicI64,
    next_address: AtomicI64,
}

impl InMemoryOrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted orders.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Number of customer rows, orphans included.
    #[must_use]
    pub fn customer_count(&self) -> usize {
        self.customers.read().len()
    }

    /// Number of address rows, orphans included.
    #[must_use]
    pub fn address_count(&self) -> usize {
        self.addresses.read().len()
    }

    /// Stored customer details, if any.
    #[must_use]
    pub fn customer(&self, id: CustomerId) -> Option<CustomerDetails> {
        self.customers.read().get(&id).cloned()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn save_customer(&self, details: &CustomerDetails) -> Result<CustomerId, StoreError> {
        let id = CustomerId::new(self.next_customer.fetch_add(1, Ordering::SeqCst) + 1);
        self.customers.write().insert(id, details.clone());
        Ok(id)
    }

    async fn save_address(&self, address: &CustomerAddress) -> Result<AddressId, StoreError> {
        let id = AddressId::new(self.next_address.fetch_add(1, Ordering::SeqCst) + 1);
        self.addresses.write().insert(id, address.clone());
        Ok(id)
    }

    async fn save_order(
        &self,
        request: &OrderRequest,
        order_type: OrderType,
        customer_id: CustomerId,
        address_id: AddressId,
    ) -> Result<PersistedOrder, StoreError> {
        match self.orders.entry(request.id) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(request.id)),
            Entry::Vacant(slot) => {
                let order = PersistedOrder {
                    id: request.id,
                    order_type,
                    customer_id,
                    address_id,
                    total_amount: request.total_amount,
                    currency: request.currency.clone(),
                    created_at: Utc::now(),
                    items: request
                        .items
                        .iter()
                        .map(|item| OrderItem::from_request(request.id, item))
                        .collect(),
                };
                slot.insert(order.clone());
                Ok(order)
            }
        }
    }

    async fn find_order(&self, order_id: OrderId) -> Result<Option<PersistedOrder>, StoreError> {
        Ok(self.orders.get(&order_id).map(|entry| entry.value().clone()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::OrderItemRequest;
    use rust_decimal_macros::dec;

    fn request(id: i64) -> OrderRequest {
        OrderRequest {
            id: OrderId::new(id),
            order_type: "ONLINE".into(),
            items: vec![OrderItemRequest {
                product_id: 1,
                quantity: 2,
                price_per_unit: dec!(29.99),
            }],
            total_amount: dec!(59.98),
            currency: "USD".into(),
            ..OrderRequest::default()
        }
    }

    #[tokio::test]
    async fn second_save_is_duplicate() {
        let store = InMemoryOrderStore::new();
        let customer = store.save_customer(&CustomerDetails::default()).await.unwrap();
        let address = store.save_address(&CustomerAddress::default()).await.unwrap();

        store
            .save_order(&request(1), OrderType::Online, customer, address)
            .await
            .unwrap();
        let err = store
            .save_order(&request(1), OrderType::Online, customer, address)
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Duplicate(id) if id == OrderId::new(1)));
        assert_eq!(store.order_count(), 1);
    }

    #[tokio::test]
    async fn generated_ids_are_distinct() {
        let store = InMemoryOrderStore::new();
        let a = store.save_customer(&CustomerDetails::default()).await.unwrap();
        let b = store.save_customer(&CustomerDetails::default()).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(store.customer_count(), 2);
    }

    #[tokio::test]
    async fn items_default_to_processing() {
        let store = InMemoryOrderStore::new();
        let customer = store.save_customer(&CustomerDetails::default()).await.unwrap();
        let address = store.save_address(&CustomerAddress::default()).await.unwrap();
        store
            .save_order(&request(2), OrderType::Online, customer, address)
            .await
            .unwrap();

        let order = store.find_order(OrderId::new(2)).await.unwrap().unwrap();
        assert_eq!(order.items.len(), 1);
        assert_eq!(
            order.items[0].status,
            crate::domain::order::ItemStatus::Processing
        );
    }
}
