//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic: configuration, in-process brokers, wiring, and runtime
//! supervision.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`broker`] - In-process queue/topic and exchange brokers
//! - [`config`] - Configuration loading and validation
//! - [`operator`] - CLI operator interface
//! - [`orchestration`] - Health probing and consumer lifecycle

pub mod bootstrap;
pub mod broker;
pub mod config;
pub mod operator;
pub mod orchestration;
