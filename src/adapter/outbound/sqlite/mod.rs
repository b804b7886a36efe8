//! SQLite persistence adapter.
//!
//! Provides the diesel-backed [`OrderStore`](crate::port::outbound::store::OrderStore)
//! implementation, its connection pool and embedded migrations.

pub mod database;
pub mod settings;
pub mod store;
