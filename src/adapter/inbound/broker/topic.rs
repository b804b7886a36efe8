//! Queue/topic broker delivery policy.

use crate::error::PlacementError;
use crate::port::outbound::broker::{Delivery, Disposition};

use super::consumer::DeliveryPolicy;

/// Default number of redeliveries after the first attempt.
pub const DEFAULT_MAX_REDELIVERIES: u32 = 1;

/// Redeliver transient failures a bounded number of times, then dead-letter.
///
/// Malformed payloads and permanent placement errors (validation, duplicate,
/// unsupported type) are dead-lettered on first sight unless
/// `retry_permanent_errors` is set.
#[derive(Debug, Clone, Copy)]
pub struct TopicRedeliveryPolicy {
    pub max_redeliveries: u32,
    pub retry_permanent_errors: bool,
}

impl Default for TopicRedeliveryPolicy {
    fn default() -> Self {
        Self {
            max_redeliveries: DEFAULT_MAX_REDELIVERIES,
            retry_permanent_errors: false,
        }
    }
}

impl TopicRedeliveryPolicy {
    fn retry_or_dead_letter(&self, delivery: &Delivery, reason: String) -> Disposition {
        if delivery.attempt <= self.max_redeliveries {
            Disposition::Redeliver
        } else {
            Disposition::DeadLetter { reason }
        }
    }
}

impl DeliveryPolicy for TopicRedeliveryPolicy {
    fn name(&self) -> &'static str {
        "topic-redelivery"
    }

    fn on_malformed(&self, _delivery: &Delivery, reason: &str) -> Disposition {
        Disposition::DeadLetter {
            reason: format!("malformed payload: {reason}"),
        }
    }

    fn on_failure(&self, delivery: &Delivery, error: &PlacementError) -> Disposition {
        if error.is_permanent() && !self.retry_permanent_errors {
            return Disposition::DeadLetter {
                reason: error.to_string(),
            };
        }
        self.retry_or_dead_letter(delivery, error.to_string())
    }
}
