//! Synchronous submission front.
//!
//! Takes a raw JSON request body, runs it through [`OrderIntake`], and maps the
//! outcome to an accepted, client-error or server-error response.

use tracing::{error, warn};

use crate::domain::order::OrderRequest;
use crate::error::PlacementError;
use crate::port::inbound::intake::{OrderIntake, PlacementReceipt};

/// Response of a synchronous submission.
#[derive(Debug, Clone)]
pub enum SubmissionOutcome {
    /// Placed. The receipt carries any sink publish failures.
    Accepted(Box<PlacementReceipt>),
    /// The caller sent something invalid; the message names the problem.
    ClientError(String),
    /// Anything else.
    ServerError(String),
}

impl SubmissionOutcome {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// HTTP-equivalent status code.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Accepted(_) => 200,
            Self::ClientError(_) => 400,
            Self::ServerError(_) => 500,
        }
    }

    /// Body text returned to the caller.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Accepted(receipt) => format!("Order placed: {}", receipt.order.id),
            Self::ClientError(message) | Self::ServerError(message) => message.clone(),
        }
    }
}

/// Decode `payload` and place it.
pub async fn submit(intake: &dyn OrderIntake, payload: &str) -> SubmissionOutcome {
    let request: OrderRequest = match serde_json::from_str(payload) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Rejected undecodable submission");
            return SubmissionOutcome::ClientError(format!("Malformed order request: {e}"));
        }
    };
    submit_request(intake, request).await
}

/// Place an already-decoded request.
pub async fn submit_request(intake: &dyn OrderIntake, request: OrderRequest) -> SubmissionOutcome {
    let order_id = request.id;
    match intake.process_new_order(request).await {
        Ok(receipt) => SubmissionOutcome::Accepted(Box::new(receipt)),
        Err(PlacementError::Validation(e)) => {
            warn!(%order_id, reason = %e, "Submission failed validation");
            SubmissionOutcome::ClientError(e.to_string())
        }
        Err(e) => {
            error!(%order_id, error = %e, kind = e.kind().as_str(), "Submission failed");
            SubmissionOutcome::ServerError(format!("Error processing order: {e}"))
        }
    }
}
