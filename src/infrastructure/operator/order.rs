//! Order operator implementation.

use async_trait::async_trait;

use crate::adapter::inbound::submit::{self, SubmissionOutcome};
use crate::domain::id::OrderId;
use crate::domain::status::OrderStatusView;
use crate::error::Result;
use crate::infrastructure::bootstrap::Services;
use crate::port::inbound::operator::order::{OrderOperator, SubmissionView};
use crate::port::inbound::status::OrderStatusQuery;

use super::{entry::Operator, shared};

#[async_trait]
impl OrderOperator for Operator {
    async fn submit_order(&self, config_toml: &str, payload: &str) -> Result<SubmissionView> {
        let config = shared::load_config(config_toml, None)?;
        let services = Services::build(config)?;
        let outcome = submit::submit(services.pipeline.as_ref(), payload).await;

        let failed_sinks = match &outcome {
            SubmissionOutcome::Accepted(receipt) => receipt
                .publish
                .failures
                .iter()
                .map(|failure| failure.sink.clone())
                .collect(),
            _ => Vec::new(),
        };
        Ok(SubmissionView {
            status_code: outcome.status_code(),
            message: outcome.message(),
            failed_sinks,
        })
    }

    async fn order_status(
        &self,
        config_toml: &str,
        order_id: i64,
    ) -> Result<Option<OrderStatusView>> {
        let config = shared::load_config(config_toml, None)?;
        let services = Services::build(config)?;
        match services.status.order_status(OrderId::new(order_id)).await {
            Ok(view) => Ok(Some(view)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
