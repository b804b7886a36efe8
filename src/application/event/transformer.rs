//! Request → event mapping.

use chrono::Utc;

use crate::domain::event::{OrderEventType, OrderPlacedEvent};
use crate::domain::order::{OrderRequest, OrderType};

/// Build the placement event for a request whose type has already been
/// resolved, stamped with the current time.
#[must_use]
pub fn order_placed(request: &OrderRequest, order_type: OrderType) -> OrderPlacedEvent {
    OrderPlacedEvent {
        order_id: request.id,
        order_type,
        event_type: OrderEventType::OrderPlaced,
        timestamp: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::OrderId;

    #[test]
    fn echoes_id_and_type() {
        let request = OrderRequest {
            id: OrderId::new(77),
            order_type: "OFFLINE".into(),
            ..OrderRequest::default()
        };
        let before = Utc::now();
        let event = order_placed(&request, OrderType::Offline);
        assert_eq!(event.order_id, OrderId::new(77));
        assert_eq!(event.order_type, OrderType::Offline);
        assert_eq!(event.event_type, OrderEventType::OrderPlaced);
        assert!(event.timestamp >= before);
    }
}
