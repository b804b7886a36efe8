//! Inbound (driving) ports consumed by inbound adapters.
//!
//! Both broker consumers and the synchronous submission front call the same
//! [`intake::OrderIntake`] so there is exactly one placement code path.

pub mod intake;
pub mod operator;
pub mod status;
