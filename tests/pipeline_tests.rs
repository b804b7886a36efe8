//! End-to-end placement over SQLite through the synchronous front.

mod harness;
mod support;

use ordergate::adapter::inbound::submit::{submit, SubmissionOutcome};
use ordergate::domain::id::OrderId;
use ordergate::domain::order::{ItemStatus, OrderType};
use ordergate::error::StatusError;
use ordergate::infrastructure::bootstrap::Services;
use ordergate::port::inbound::status::OrderStatusQuery;

use harness::temp_db::TempDb;
use support::fixtures::{order_json, order_json_with_email, MALFORMED_JSON, VALID_ORDER_JSON};

#[tokio::test]
async fn valid_order_is_placed_and_queryable() {
    let db = TempDb::create("placed");
    let services = db.services();

    let outcome = submit(services.pipeline.as_ref(), VALID_ORDER_JSON).await;
    assert_eq!(outcome.status_code(), 200);
    assert_eq!(outcome.message(), "Order placed: 1234567");

    let view = services
        .status
        .order_status(OrderId::new(1_234_567))
        .await
        .unwrap();
    assert_eq!(view.order_type, OrderType::Online);
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].product_id, 1);
    assert_eq!(view.items[0].quantity, 2);
    assert_eq!(view.items[0].status, ItemStatus::Processing);
}

#[tokio::test]
async fn placement_event_reaches_exchange_event_queue() {
    let db = TempDb::create("event");
    let services = db.services();

    let outcome = submit(services.pipeline.as_ref(), &order_json(77, "OFFLINE")).await;
    let SubmissionOutcome::Accepted(receipt) = outcome else {
        panic!("expected acceptance");
    };
    assert!(receipt.publish.is_complete());

    let queue = services
        .exchange_broker
        .queue(&services.config.exchange_broker.event_queue)
        .unwrap();
    let payloads = queue.payloads();
    assert_eq!(payloads.len(), 1);
    assert!(payloads[0].contains("\"orderId\":77"));
    assert!(payloads[0].contains("\"orderType\":\"OFFLINE\""));
    assert!(payloads[0].contains("\"eventType\":\"ORDER_PLACED\""));
}

#[tokio::test]
async fn unconsumed_event_queue_keeps_only_newest_events() {
    let db = TempDb::create("event-bound");
    let mut config = db.config();
    config.exchange_broker.event_queue_max_length = 2;
    let services = Services::with_store(config, db.store()).unwrap();

    for id in [81, 82, 83] {
        let outcome = submit(services.pipeline.as_ref(), &order_json(id, "ONLINE")).await;
        assert_eq!(outcome.status_code(), 200);
    }

    let queue = services
        .exchange_broker
        .queue(&services.config.exchange_broker.event_queue)
        .unwrap();
    let payloads = queue.payloads();
    assert_eq!(payloads.len(), 2);
    assert!(payloads[0].contains("\"orderId\":82"));
    assert!(payloads[1].contains("\"orderId\":83"));
}

#[tokio::test]
async fn invalid_order_type_is_a_client_error_and_not_persisted() {
    let db = TempDb::create("invalid-type");
    let services = db.services();

    let outcome = submit(services.pipeline.as_ref(), &order_json(5, "INVALID")).await;
    assert_eq!(outcome.status_code(), 400);
    assert_eq!(outcome.message(), "Invalid order type: INVALID");

    let err = services.status.order_status(OrderId::new(5)).await.unwrap_err();
    assert!(matches!(err, StatusError::OrderNotFound(_)));
}

#[tokio::test]
async fn invalid_email_is_named_in_the_response() {
    let db = TempDb::create("invalid-email");
    let services = db.services();

    let outcome = submit(
        services.pipeline.as_ref(),
        &order_json_with_email(6, "not-an-email"),
    )
    .await;
    assert_eq!(outcome.status_code(), 400);
    assert_eq!(outcome.message(), "Invalid email provided: not-an-email");
}

#[tokio::test]
async fn malformed_body_is_a_client_error() {
    let db = TempDb::create("malformed");
    let services = db.services();

    let outcome = submit(services.pipeline.as_ref(), MALFORMED_JSON).await;
    assert_eq!(outcome.status_code(), 400);
    assert!(outcome.message().starts_with("Malformed order request"));
}

#[tokio::test]
async fn in_store_order_without_processor_is_a_server_error() {
    let db = TempDb::create("in-store");
    let services = db.services();

    let outcome = submit(services.pipeline.as_ref(), &order_json(8, "IN_STORE")).await;
    assert_eq!(outcome.status_code(), 500);
    assert!(outcome.message().starts_with("Error processing order:"));
    assert!(outcome.message().contains("IN_STORE"));
}

#[tokio::test]
async fn unknown_order_status_is_not_found() {
    let db = TempDb::create("unknown-status");
    let services = db.services();

    let err = services
        .status
        .order_status(OrderId::new(404))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Order not found with id: 404");
}
