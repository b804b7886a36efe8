//! Transport-agnostic order domain.
//!
//! Holds the request, persisted record, event and read-model types. No I/O
//! lives here.

pub mod event;
pub mod id;
pub mod order;
pub mod status;
