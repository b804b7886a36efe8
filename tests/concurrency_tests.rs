//! Racing submissions of one id resolve through the store constraint.

mod harness;

use std::sync::Arc;

use futures_util::future::join_all;
use ordergate::error::FailureKind;
use ordergate::port::inbound::intake::OrderIntake;
use ordergate::port::outbound::sink::EventSink;
use ordergate::testkit;
use ordergate::testkit::sink::RecordingSink;

use harness::temp_db::TempDb;

const RACERS: usize = 8;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicates_place_exactly_once() {
    let db = TempDb::create("race");
    let sink = Arc::new(RecordingSink::new("recording"));
    let sinks: Vec<Arc<dyn EventSink>> = vec![sink.clone()];
    let pipeline = Arc::new(testkit::pipeline::build(db.store(), sinks));

    let tasks = (0..RACERS).map(|_| {
        let pipeline = Arc::clone(&pipeline);
        tokio::spawn(async move {
            pipeline
                .process_new_order(testkit::domain::valid_request())
                .await
        })
    });
    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let placed = results.iter().filter(|result| result.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|result| {
            matches!(result, Err(err) if err.kind() == FailureKind::Duplicate)
        })
        .count();
    assert_eq!(placed, 1);
    assert_eq!(duplicates, RACERS - 1);
    assert_eq!(sink.count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_distinct_ids_all_succeed() {
    let db = TempDb::create("distinct-race");
    let pipeline = Arc::new(testkit::pipeline::build(db.store(), Vec::new()));

    let tasks = (1..=RACERS as i64).map(|id| {
        let pipeline = Arc::clone(&pipeline);
        tokio::spawn(async move {
            pipeline
                .process_new_order(testkit::domain::request_with_id(id))
                .await
        })
    });
    let results = join_all(tasks).await;

    assert!(results
        .into_iter()
        .all(|joined| joined.map(|result| result.is_ok()).unwrap_or(false)));
}
