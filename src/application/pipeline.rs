//! Placement orchestrator.
//!
//! The one code path every transport goes through:
//! validate → resolve processor → persist → build event → fan out.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::order::{OrderRequest, OrderType, PersistedOrder};
use crate::error::{PlacementError, ValidationError};
use crate::port::inbound::intake::{budget_exceeded, OrderIntake, PlacementReceipt};

use super::event::producer::EventProducer;
use super::event::transformer;
use super::processor::registry::ProcessorRegistry;
use super::validation::chain::ValidatorChain;

/// Wires the validator chain, processor registry and event producer.
///
/// Holds no per-call mutable state. Concurrent duplicate submissions are
/// resolved by the store's uniqueness constraint alone.
pub struct OrderPipeline {
    validator: ValidatorChain,
    processors: ProcessorRegistry,
    producer: EventProducer,
}

impl OrderPipeline {
    pub fn new(
        validator: ValidatorChain,
        processors: ProcessorRegistry,
        producer: EventProducer,
    ) -> Self {
        Self {
            validator,
            processors,
            producer,
        }
    }

    #[must_use]
    pub fn producer(&self) -> &EventProducer {
        &self.producer
    }

    #[must_use]
    pub fn processors(&self) -> &ProcessorRegistry {
        &self.processors
    }
}

impl OrderPipeline {
    /// Everything up to and including the commit.
    async fn place(
        &self,
        request: &OrderRequest,
    ) -> Result<(OrderType, PersistedOrder), PlacementError> {
        self.validator.validate(request)?;

        let order_type =
            request
                .parsed_order_type()
                .ok_or_else(|| ValidationError::InvalidOrderType {
                    order_type: request.order_type.clone(),
                })?;

        let processor = self.processors.resolve(order_type)?;
        let order = processor.process(request).await?;
        Ok((order_type, order))
    }

    /// Post-commit fan-out. Never fails; sink outcomes land in the receipt.
    async fn announce(
        &self,
        request: &OrderRequest,
        order_type: OrderType,
        order: PersistedOrder,
    ) -> PlacementReceipt {
        let event = transformer::order_placed(request, order_type);
        let publish = self.producer.publish(&event).await;
        for failure in &publish.failures {
            warn!(
                order_id = %request.id,
                sink = %failure.sink,
                reason = %failure.reason,
                "Placement event not delivered"
            );
        }

        info!(
            order_id = %request.id,
            order_type = %order_type,
            delivered = publish.delivered.len(),
            failed = publish.failures.len(),
            "Order placed"
        );

        PlacementReceipt {
            order,
            event,
            publish,
        }
    }
}

#[async_trait]
impl OrderIntake for OrderPipeline {
    async fn process_new_order(
        &self,
        request: OrderRequest,
    ) -> Result<PlacementReceipt, PlacementError> {
        let (order_type, order) = self.place(&request).await?;
        Ok(self.announce(&request, order_type, order).await)
    }

    /// The budget covers validation and persistence. Publication is bounded
    /// per sink by the producer instead.
    async fn process_within(
        &self,
        request: OrderRequest,
        budget: Duration,
    ) -> Result<PlacementReceipt, PlacementError> {
        let (order_type, order) = tokio::time::timeout(budget, self.place(&request))
            .await
            .map_err(|_| budget_exceeded(budget))??;
        Ok(self.announce(&request, order_type, order).await)
    }
}
