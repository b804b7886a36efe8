//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Order request fixtures.
//! - [`store`] - Store handles for application-layer tests.
//! - [`sink`] - Recording and failing event sinks.
//! - [`intake`] - Scripted `OrderIntake` for transport adapter tests.
//! - [`broker`] - Vec-backed `MessageSource`.
//! - [`pipeline`] - Fully wired pipeline over a given store and sinks.
//! - [`config`] - Canonical test configurations.

pub mod broker;
pub mod config;
pub mod domain;
pub mod intake;
pub mod pipeline;
pub mod sink;
pub mod store;
