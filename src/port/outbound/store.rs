//! Persistence port for orders.

use async_trait::async_trait;

use crate::domain::id::{AddressId, CustomerId, OrderId};
use crate::domain::order::{
    CustomerAddress, CustomerDetails, OrderRequest, OrderType, PersistedOrder,
};
use crate::error::StoreError;

/// Storage operations for placed orders.
///
/// # Implementation Notes
///
/// - `save_order` writes the order row and all item rows atomically.
/// - Duplicate ids must be detected by the storage uniqueness constraint and
///   reported as [`StoreError::Duplicate`], never by a prior existence read.
/// - Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist customer contact details, returning the generated id.
    async fn save_customer(&self, details: &CustomerDetails) -> Result<CustomerId, StoreError>;

    /// Persist a customer address, returning the generated id.
    async fn save_address(&self, address: &CustomerAddress) -> Result<AddressId, StoreError>;

    /// Persist the order and its items as one unit.
    async fn save_order(
        &self,
        request: &OrderRequest,
        order_type: OrderType,
        customer_id: CustomerId,
        address_id: AddressId,
    ) -> Result<PersistedOrder, StoreError>;

    /// Load an order with its items.
    async fn find_order(&self, order_id: OrderId) -> Result<Option<PersistedOrder>, StoreError>;

    /// Cheap reachability probe for health checks.
    async fn ping(&self) -> Result<(), StoreError>;
}
