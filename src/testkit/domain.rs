//! Order request fixtures.

use rust_decimal_macros::dec;

use crate::domain::id::OrderId;
use crate::domain::order::{CustomerAddress, CustomerDetails, OrderItemRequest, OrderRequest};

/// Id used by [`valid_request`].
pub const SAMPLE_ORDER_ID: i64 = 1_234_567;

/// John Doe's single-item ONLINE order.
pub fn valid_request() -> OrderRequest {
    OrderRequest {
        id: OrderId::new(SAMPLE_ORDER_ID),
        order_type: "ONLINE".to_string(),
        customer_details: CustomerDetails {
            name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            phone: "+1234567890".to_string(),
        },
        customer_address: CustomerAddress {
            street: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
            country: "US".to_string(),
        },
        items: vec![OrderItemRequest {
            product_id: 1,
            quantity: 2,
            price_per_unit: dec!(29.99),
        }],
        total_amount: dec!(59.98),
        currency: "USD".to_string(),
    }
}

/// [`valid_request`] with a different id.
pub fn request_with_id(id: i64) -> OrderRequest {
    OrderRequest {
        id: OrderId::new(id),
        ..valid_request()
    }
}

/// [`valid_request`] with the given raw order type.
pub fn request_with_type(order_type: &str) -> OrderRequest {
    OrderRequest {
        order_type: order_type.to_string(),
        ..valid_request()
    }
}

/// JSON body for a request.
pub fn payload(request: &OrderRequest) -> String {
    serde_json::to_string(request).unwrap_or_default()
}
