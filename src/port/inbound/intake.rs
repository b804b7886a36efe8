//! Order placement port.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::event::OrderPlacedEvent;
use crate::domain::order::{OrderRequest, PersistedOrder};
use crate::error::{PlacementError, SinkError};

/// Per-sink outcome of publishing one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Sinks that accepted the event.
    pub delivered: Vec<String>,
    /// Sinks that rejected it or were unreachable.
    pub failures: Vec<SinkError>,
}

impl PublishReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failure for the named sink, if any.
    #[must_use]
    pub fn failure_for(&self, sink: &str) -> Option<&SinkError> {
        self.failures.iter().find(|failure| failure.sink == sink)
    }
}

/// Result of a successful placement.
///
/// The order is durable regardless of `publish`; sink failures are reported
/// here rather than as an error.
#[derive(Debug, Clone)]
pub struct PlacementReceipt {
    pub order: PersistedOrder,
    pub event: OrderPlacedEvent,
    pub publish: PublishReport,
}

/// Validation → persistence → dispatch → publication, for one request.
///
/// Implementations are reentrant and hold no per-call shared mutable state.
#[async_trait]
pub trait OrderIntake: Send + Sync {
    async fn process_new_order(
        &self,
        request: OrderRequest,
    ) -> Result<PlacementReceipt, PlacementError>;

    /// [`process_new_order`](Self::process_new_order) with a time budget.
    ///
    /// Exceeding the budget is a transient infrastructure failure.
    /// Implementations that publish after committing should bound only the
    /// work up to the commit, so a slow sink never fails a durable order.
    async fn process_within(
        &self,
        request: OrderRequest,
        budget: Duration,
    ) -> Result<PlacementReceipt, PlacementError> {
        tokio::time::timeout(budget, self.process_new_order(request))
            .await
            .unwrap_or_else(|_| Err(budget_exceeded(budget)))
    }
}

/// Error reported when placement outlives its budget.
#[must_use]
pub fn budget_exceeded(budget: Duration) -> PlacementError {
    PlacementError::Infrastructure(format!("processing exceeded {}ms", budget.as_millis()))
}
