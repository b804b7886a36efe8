//! Canonical test configurations.

use crate::application::event::producer::ProducerConfig;

/// Single attempt, no delay.
pub fn producer() -> ProducerConfig {
    ProducerConfig {
        max_attempts: 1,
        retry_delay_ms: 0,
        publish_timeout_ms: 1_000,
    }
}
