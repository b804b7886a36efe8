//! Store handles for application-layer tests.

use std::sync::Arc;

use crate::adapter::outbound::memory::store::InMemoryOrderStore;
use crate::port::outbound::store::OrderStore;

/// Fresh in-memory store behind the port.
pub fn memory() -> Arc<dyn OrderStore> {
    Arc::new(InMemoryOrderStore::new())
}

/// Fresh in-memory store, concrete type, for row-count assertions.
pub fn memory_concrete() -> Arc<InMemoryOrderStore> {
    Arc::new(InMemoryOrderStore::new())
}
