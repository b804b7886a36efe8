//! Placement event construction and publication.

pub mod producer;
pub mod transformer;
