//! Raw request bodies as clients send them.

/// John Doe's ONLINE order, as submitted over the wire.
pub const VALID_ORDER_JSON: &str = r#"{
    "id": 1234567,
    "orderType": "ONLINE",
    "customerDetails": {
        "name": "John Doe",
        "email": "john.doe@example.com",
        "phone": "+1234567890"
    },
    "customerAddress": {
        "street": "1 Main St",
        "city": "Springfield",
        "state": "IL",
        "zipCode": "62701",
        "country": "US"
    },
    "items": [
        { "productId": 1, "quantity": 2, "pricePerUnit": 29.99 }
    ],
    "totalAmount": 59.98,
    "currency": "USD"
}"#;

/// Valid order body with the given id and order type.
pub fn order_json(id: i64, order_type: &str) -> String {
    VALID_ORDER_JSON
        .replace("1234567", &id.to_string())
        .replace("\"ONLINE\"", &format!("\"{order_type}\""))
}

/// Valid order body with a bad email.
pub fn order_json_with_email(id: i64, email: &str) -> String {
    order_json(id, "ONLINE").replace("john.doe@example.com", email)
}

pub const MALFORMED_JSON: &str = "{ not json";
