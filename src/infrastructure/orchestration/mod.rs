//! Application orchestration.
//!
//! Dependency health probing and consumer lifecycle management.

pub mod health;
pub mod runtime;
