//! Ordergate - order intake pipeline.
//!
//! Orders arrive from a queue/topic broker, an exchange broker, or a
//! synchronous submission. Every transport calls the same placement path:
//! validate, dispatch by order type, persist idempotently, and fan a
//! placement event out to every sink.
//!
//! # Architecture
//!
//! - [`domain`] - Order request, persisted order, event and status types
//! - [`port`] - Inbound (`OrderIntake`, `OrderStatusQuery`) and outbound
//!   (`OrderStore`, `EventSink`, broker) contracts
//! - [`application`] - Validator chain, processor registry, event producer,
//!   pipeline and status service
//! - [`adapter`] - Broker consumers, submission front, CLI, SQLite and
//!   in-memory stores, event sinks
//! - [`infrastructure`] - Configuration, in-process brokers, wiring, runtime
//! - [`error`] - Error types for the crate

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
