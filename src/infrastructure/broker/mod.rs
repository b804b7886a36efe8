//! In-process message broker transports.
//!
//! - [`queue`]: FIFO queue shared by both transports
//! - [`topic`]: queue/topic broker with redelivery and per-queue dead letters
//! - [`exchange`]: exchange/binding broker with dead-letter-exchange routing

pub mod exchange;
pub mod queue;
pub mod topic;
