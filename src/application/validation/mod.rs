//! Validator chain for incoming order requests.
//!
//! Checks run in a fixed order and the first failure short-circuits the chain.
//! The returned [`ValidationError`](crate::error::ValidationError) is surfaced
//! to the caller unchanged.

pub mod chain;
pub mod config;
pub mod rules;
