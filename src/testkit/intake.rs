//! Scripted [`OrderIntake`] for transport adapter tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::application::event::transformer;
use crate::domain::id::{AddressId, CustomerId};
use crate::domain::order::{OrderItem, OrderRequest, OrderType, PersistedOrder};
use crate::error::PlacementError;
use crate::port::inbound::intake::{OrderIntake, PlacementReceipt, PublishReport};

enum Script {
    Succeed,
    Fail(PlacementError),
    Stall(Duration),
    Panic,
}

/// Returns a canned outcome for every request and counts calls.
pub struct ScriptedIntake {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedIntake {
    pub fn succeeding() -> Self {
        Self::with(Script::Succeed)
    }

    pub fn failing(error: PlacementError) -> Self {
        Self::with(Script::Fail(error))
    }

    /// Sleeps before succeeding.
    pub fn stalling(delay: Duration) -> Self {
        Self::with(Script::Stall(delay))
    }

    /// Panics on every call.
    pub fn panicking() -> Self {
        Self::with(Script::Panic)
    }

    fn with(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderIntake for ScriptedIntake {
    async fn process_new_order(
        &self,
        request: OrderRequest,
    ) -> Result<PlacementReceipt, PlacementError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Succeed => Ok(receipt(&request)),
            Script::Fail(error) => Err(error.clone()),
            Script::Stall(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(receipt(&request))
            }
            Script::Panic => panic!("scripted panic for order {}", request.id),
        }
    }
}

/// Receipt as a real placement of `request` would produce it.
pub fn receipt(request: &OrderRequest) -> PlacementReceipt {
    let order_type = request.parsed_order_type().unwrap_or(OrderType::Online);
    PlacementReceipt {
        order: PersistedOrder {
            id: request.id,
            order_type,
            customer_id: CustomerId::new(1),
            address_id: AddressId::new(1),
            total_amount: request.total_amount,
            currency: request.currency.clone(),
            created_at: Utc::now(),
            items: request
                .items
                .iter()
                .map(|item| OrderItem::from_request(request.id, item))
                .collect(),
        },
        event: transformer::order_placed(request, order_type),
        publish: PublishReport::default(),
    }
}
