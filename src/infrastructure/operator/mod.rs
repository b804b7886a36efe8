//! Operator implementations for inbound adapters.

pub mod diagnostic;
pub mod entry;
pub mod order;
pub mod runtime;

mod shared;
