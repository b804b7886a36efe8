//! Exchange broker delivery policy.

use crate::error::PlacementError;
use crate::port::outbound::broker::{Delivery, Disposition};

use super::consumer::DeliveryPolicy;

/// Reject every failure without requeue; the queue's dead-letter exchange
/// takes it from there.
#[derive(Debug, Default, Clone, Copy)]
pub struct RejectPolicy;

impl DeliveryPolicy for RejectPolicy {
    fn name(&self) -> &'static str {
        "reject-to-dlx"
    }

    fn on_malformed(&self, _delivery: &Delivery, _reason: &str) -> Disposition {
        Disposition::Reject { requeue: false }
    }

    fn on_failure(&self, _delivery: &Delivery, _error: &PlacementError) -> Disposition {
        Disposition::Reject { requeue: false }
    }

    fn on_panic(&self, _delivery: &Delivery, _reason: &str) -> Disposition {
        Disposition::Reject { requeue: false }
    }
}
