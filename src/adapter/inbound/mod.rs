//! Inbound adapters (driving side).
//!
//! Broker consumers, the synchronous submission front, and the CLI.

pub mod broker;
pub mod cli;
pub mod submit;
