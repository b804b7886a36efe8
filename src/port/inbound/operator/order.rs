//! Order submission and lookup for operator-facing adapters.

use async_trait::async_trait;

use crate::domain::status::OrderStatusView;
use crate::error::Result;

/// Outcome of a one-shot submission.
#[derive(Debug, Clone)]
pub struct SubmissionView {
    /// HTTP-equivalent status (200, 400 or 500).
    pub status_code: u16,
    pub message: String,
    /// Sinks that failed to receive the placement event.
    pub failed_sinks: Vec<String>,
}

impl SubmissionView {
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        self.status_code == 200
    }
}

/// Order use-cases for operator-facing adapters.
#[async_trait]
pub trait OrderOperator: Send + Sync {
    /// Place one order from a JSON body.
    async fn submit_order(&self, config_toml: &str, payload: &str) -> Result<SubmissionView>;

    /// Look up an order. `Ok(None)` when the order or its items are absent.
    async fn order_status(&self, config_toml: &str, order_id: i64)
        -> Result<Option<OrderStatusView>>;
}
