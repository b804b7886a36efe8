//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!   broker A ─┐                                   ┌─▶ topic sink
//!   broker B ─┼─▶ OrderIntake ─▶ pipeline ─▶ OrderStore
//!   submit   ─┘                          └──────┴─▶ exchange sink
//! ```
//!
//! # Available Ports
//!
//! - [`inbound::intake::OrderIntake`] - single placement entry point for every transport
//! - [`inbound::status::OrderStatusQuery`] - order status lookups
//! - [`outbound::store::OrderStore`] - idempotent order persistence
//! - [`outbound::sink::EventSink`] - notification sink for placement events

pub mod inbound;
pub mod outbound;
