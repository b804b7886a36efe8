//! Event sink adapters.
//!
//! Each sink implements `port::outbound::sink::EventSink` on top of one
//! broker publishing port, or the log.

pub mod exchange;
pub mod log;
pub mod topic;
