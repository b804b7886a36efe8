//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters through
//! the ports to implement order placement and status lookups.

pub mod event;
pub mod pipeline;
pub mod processor;
pub mod status;
pub mod validation;
