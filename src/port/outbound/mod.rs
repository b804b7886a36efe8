//! Outbound ports (driven side): interfaces implemented by outbound adapters
//! and infrastructure transports.

pub mod broker;
pub mod sink;
pub mod store;
