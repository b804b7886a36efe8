//! Read model returned by the status query.

use serde::{Deserialize, Serialize};

use super::id::OrderId;
use super::order::{ItemStatus, OrderType};

/// Per-item fulfilment view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemStatus {
    pub product_id: i64,
    pub quantity: i32,
    pub status: ItemStatus,
}

/// Order type plus item statuses for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusView {
    pub order_id: OrderId,
    pub order_type: OrderType,
    pub items: Vec<OrderItemStatus>,
}
