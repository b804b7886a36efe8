//! Vec-backed [`MessageSource`].

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::BrokerError;
use crate::port::outbound::broker::{Delivery, Disposition, MessageSource};

/// Hands out preloaded deliveries, then reports closed. Records settlements.
pub struct VecSource {
    pending: Mutex<VecDeque<Delivery>>,
    settled: Mutex<Vec<(Delivery, Disposition)>>,
}

impl VecSource {
    pub fn new(deliveries: Vec<Delivery>) -> Self {
        Self {
            pending: Mutex::new(deliveries.into()),
            settled: Mutex::new(Vec::new()),
        }
    }

    pub fn settled(&self) -> Vec<(Delivery, Disposition)> {
        self.settled.lock().clone()
    }
}

#[async_trait]
impl MessageSource for VecSource {
    fn queue(&self) -> &str {
        "vec"
    }

    async fn receive(&self) -> Option<Delivery> {
        self.pending.lock().pop_front()
    }

    async fn settle(&self, delivery: Delivery, disposition: Disposition) -> Result<(), BrokerError> {
        self.settled.lock().push((delivery, disposition));
        Ok(())
    }
}
