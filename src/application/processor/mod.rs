//! Order-type dispatch.
//!
//! - [`registry`]: the [`OrderProcessor`](registry::OrderProcessor) contract
//!   and the type → processor lookup
//! - [`variant`]: built-in online and offline processors
//! - [`persistence`]: the shared save path every variant delegates to

pub mod config;
pub mod persistence;
pub mod registry;
pub mod variant;
