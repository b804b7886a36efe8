//! Outbound adapters (driven side).

pub mod memory;
pub mod sink;
pub mod sqlite;
