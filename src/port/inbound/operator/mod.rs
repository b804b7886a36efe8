//! Operator-facing inbound ports consumed by CLI adapters.

pub mod diagnostic;
pub mod order;
pub mod port;
pub mod runtime;
