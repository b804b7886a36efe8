use async_trait::async_trait;

use crate::domain::id::OrderId;
use crate::domain::status::OrderStatusView;
use crate::error::StatusError;

/// Read side: order type plus per-item status.
#[async_trait]
pub trait OrderStatusQuery: Send + Sync {
    async fn order_status(&self, order_id: OrderId) -> Result<OrderStatusView, StatusError>;
}
