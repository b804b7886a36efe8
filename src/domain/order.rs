//! Order request and persisted order types.
//!
//! [`OrderRequest`] is untrusted input straight off a transport. Missing
//! fields deserialize to empty values so the validator chain can name them;
//! nothing here rejects a request on its own.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{AddressId, CustomerId, OrderId};

/// Closed set of order channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Online,
    Offline,
    InStore,
}

impl OrderType {
    /// Every member, in declaration order.
    pub const ALL: [OrderType; 3] = [Self::Online, Self::Offline, Self::InStore];

    /// Wire name, e.g. `IN_STORE`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "ONLINE",
            Self::Offline => "OFFLINE",
            Self::InStore => "IN_STORE",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised order type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOrderType(pub String);

impl fmt::Display for UnknownOrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown order type: {}", self.0)
    }
}

impl std::error::Error for UnknownOrderType {}

impl FromStr for OrderType {
    type Err = UnknownOrderType;

    /// Case-sensitive exact match against the wire names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| UnknownOrderType(s.to_string()))
    }
}

/// Customer contact details as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Delivery address as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomerAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// One requested line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: i64,
    pub quantity: i32,
    pub price_per_unit: Decimal,
}

impl OrderItemRequest {
    /// quantity × price per unit, `None` on overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        Decimal::from(self.quantity).checked_mul(self.price_per_unit)
    }
}

/// New-order submission.
///
/// `id` also accepts `UUID`, `items` also accepts `orderItems`, and
/// `totalAmount` also accepts `orderAmount` or `amount`. Unknown fields are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderRequest {
    #[serde(alias = "UUID")]
    pub id: OrderId,
    pub order_type: String,
    pub customer_details: CustomerDetails,
    pub customer_address: CustomerAddress,
    #[serde(alias = "orderItems")]
    pub items: Vec<OrderItemRequest>,
    #[serde(alias = "orderAmount", alias = "amount")]
    pub total_amount: Decimal,
    pub currency: String,
}

impl OrderRequest {
    /// Parsed order type, if the raw value names a member of [`OrderType`].
    #[must_use]
    pub fn parsed_order_type(&self) -> Option<OrderType> {
        self.order_type.parse().ok()
    }

    /// Σ(quantity × price per unit) across all items, `None` on overflow.
    #[must_use]
    pub fn computed_total(&self) -> Option<Decimal> {
        self.items.iter().try_fold(Decimal::ZERO, |total, item| {
            total.checked_add(item.line_total()?)
        })
    }
}

/// Fulfilment status of a single order item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    #[default]
    Processing,
    Shipped,
    Delivered,
    Returned,
    Cancelled,
    Refunded,
    Exchanged,
    Pending,
    Completed,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 9] = [
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Returned,
        Self::Cancelled,
        Self::Refunded,
        Self::Exchanged,
        Self::Pending,
        Self::Completed,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "PROCESSING",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Returned => "RETURNED",
            Self::Cancelled => "CANCELLED",
            Self::Refunded => "REFUNDED",
            Self::Exchanged => "EXCHANGED",
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
        }
    }

    /// Case-insensitive lookup, as stored status strings may vary in case.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable order record. Created once per id, never updated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedOrder {
    pub id: OrderId,
    pub order_type: OrderType,
    pub customer_id: CustomerId,
    pub address_id: AddressId,
    pub total_amount: Decimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

/// Child row of a [`PersistedOrder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub order_id: OrderId,
    pub product_id: i64,
    pub quantity: i32,
    pub price_per_unit: Decimal,
    pub status: ItemStatus,
}

impl OrderItem {
    /// Build a fresh item row in the default status.
    #[must_use]
    pub fn from_request(order_id: OrderId, item: &OrderItemRequest) -> Self {
        Self {
            order_id,
            product_id: item.product_id,
            quantity: item.quantity,
            price_per_unit: item.price_per_unit,
            status: ItemStatus::default(),
        }
    }
}
