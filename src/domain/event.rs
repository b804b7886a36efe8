//! Order lifecycle events.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::OrderId;
use super::order::OrderType;

/// Lifecycle event tags. Intake only ever emits [`OrderEventType::OrderPlaced`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEventType {
    OrderPlaced,
    OrderDispatched,
    OrderDelivered,
    OrderCancelled,
    OrderReturned,
    OrderRefunded,
    OrderCompleted,
}

impl OrderEventType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OrderPlaced => "ORDER_PLACED",
            Self::OrderDispatched => "ORDER_DISPATCHED",
            Self::OrderDelivered => "ORDER_DELIVERED",
            Self::OrderCancelled => "ORDER_CANCELLED",
            Self::OrderReturned => "ORDER_RETURNED",
            Self::OrderRefunded => "ORDER_REFUNDED",
            Self::OrderCompleted => "ORDER_COMPLETED",
        }
    }
}

impl fmt::Display for OrderEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification emitted once per successful placement. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlacedEvent {
    pub order_id: OrderId,
    pub order_type: OrderType,
    pub event_type: OrderEventType,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn event_serializes_to_stable_shape() {
        let event = OrderPlacedEvent {
            order_id: OrderId::new(1_234_567),
            order_type: OrderType::Online,
            event_type: OrderEventType::OrderPlaced,
            timestamp: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
        };

        let value: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["orderId"], 1_234_567);
        assert_eq!(value["orderType"], "ONLINE");
        assert_eq!(value["eventType"], "ORDER_PLACED");
        assert_eq!(value["timestamp"], "2026-01-02T03:04:05Z");
    }
}
