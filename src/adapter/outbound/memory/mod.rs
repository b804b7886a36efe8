//! In-memory order store.

pub mod store;
