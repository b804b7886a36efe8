use thiserror::Error;

use crate::domain::id::OrderId;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// First failed check of the validator chain.
///
/// The `Display` output is the reason handed back to callers verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Order id must be present and non-zero")]
    MissingId,

    #[error("Order type cannot be null or empty")]
    MissingOrderType,

    #[error("Invalid order type: {order_type}")]
    InvalidOrderType { order_type: String },

    #[error("Customer name cannot be null or empty")]
    MissingCustomerName,

    #[error("Invalid email provided: {email}")]
    InvalidEmail { email: String },

    #[error("Phone number cannot be empty")]
    MissingPhone,

    #[error("Invalid phone number provided: {phone}")]
    InvalidPhone { phone: String },

    #[error("Item {index} has non-positive quantity {quantity}")]
    NonPositiveQuantity { index: usize, quantity: i32 },

    #[error("Item {index} has negative price per unit {price}")]
    NegativePrice {
        index: usize,
        price: rust_decimal::Decimal,
    },

    #[error("Order total overflows")]
    TotalOverflow,

    #[error("Total amount {declared} does not match item sum {computed}")]
    TotalMismatch {
        declared: rust_decimal::Decimal,
        computed: rust_decimal::Decimal,
    },
}

/// Broad classification of a placement failure, used by transport adapters
/// to pick a retry or dead-letter action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    Duplicate,
    UnsupportedOrderType,
    TransientInfrastructure,
}

impl FailureKind {
    /// Stable identifier for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Duplicate => "duplicate",
            Self::UnsupportedOrderType => "unsupported_order_type",
            Self::TransientInfrastructure => "transient_infrastructure",
        }
    }
}

/// Failure returned by `process_new_order`.
#[derive(Error, Debug, Clone)]
pub enum PlacementError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("order {order_id} already exists")]
    Duplicate { order_id: OrderId },

    #[error("no processor registered for order type: {order_type}")]
    UnsupportedOrderType { order_type: String },

    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

impl PlacementError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Validation(_) => FailureKind::Validation,
            Self::Duplicate { .. } => FailureKind::Duplicate,
            Self::UnsupportedOrderType { .. } => FailureKind::UnsupportedOrderType,
            Self::Infrastructure(_) => FailureKind::TransientInfrastructure,
        }
    }

    /// True when replaying the same message can never succeed.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        !matches!(self, Self::Infrastructure(_))
    }
}

/// Storage-layer failures.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("order {0} already exists")]
    Duplicate(OrderId),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl From<StoreError> for PlacementError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(order_id) => Self::Duplicate { order_id },
            other => Self::Infrastructure(other.to_string()),
        }
    }
}

/// Failures of the order status query.
#[derive(Error, Debug, Clone)]
pub enum StatusError {
    #[error("Order not found with id: {0}")]
    OrderNotFound(OrderId),

    #[error("No order items found for order with id: {0}")]
    ItemsNotFound(OrderId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl StatusError {
    /// True for the two not-found variants.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::OrderNotFound(_) | Self::ItemsNotFound(_))
    }
}

/// Publish failure for a single notification sink.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("sink {sink} failed: {reason}")]
pub struct SinkError {
    pub sink: String,
    pub reason: String,
}

impl SinkError {
    pub fn new(sink: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            sink: sink.into(),
            reason: reason.into(),
        }
    }
}

/// Message-broker transport errors.
#[derive(Error, Debug, Clone)]
pub enum BrokerError {
    #[error("unknown destination: {0}")]
    UnknownDestination(String),

    #[error("broker {0} is unreachable")]
    Unreachable(String),

    #[error("broker closed")]
    Closed,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Status(#[from] StatusError),

    #[error(transparent)]
    Broker(#[from] BrokerError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    /// A command ran but its outcome is a failure, e.g. a rejected order.
    #[error("{0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_store_error_maps_to_duplicate_placement() {
        let err: PlacementError = StoreError::Duplicate(OrderId::new(7)).into();
        assert_eq!(err.kind(), FailureKind::Duplicate);
        assert!(err.is_permanent());
    }

    #[test]
    fn unavailable_store_error_is_transient() {
        let err: PlacementError = StoreError::Unavailable("pool timed out".into()).into();
        assert_eq!(err.kind(), FailureKind::TransientInfrastructure);
        assert!(!err.is_permanent());
    }

    #[test]
    fn validation_message_is_surfaced_verbatim() {
        let err = PlacementError::from(ValidationError::InvalidOrderType {
            order_type: "INVALID".into(),
        });
        assert_eq!(err.to_string(), "Invalid order type: INVALID");
        assert_eq!(err.kind(), FailureKind::Validation);
    }
}
