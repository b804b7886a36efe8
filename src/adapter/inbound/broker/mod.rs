//! Broker consumer adapters.
//!
//! - [`consumer`] - Generic receive/handle/settle loop
//! - [`topic`] - Redelivery policy for the queue/topic broker
//! - [`exchange`] - Reject-to-DLX policy for the exchange broker

pub mod consumer;
pub mod exchange;
pub mod topic;
