//! Tests for publishing batches and waiting on acknowledgments.

mod common;

use common::MockSender;
use kafka_test_client::{
    CountdownLatch, DeliveryTracker, PublishOptions, PublishReport, Publisher, SendMode,
    TestMessage,
};
use std::sync::Arc;
use std::time::Duration;

fn options(mode: SendMode) -> PublishOptions {
    PublishOptions {
        mode,
        ..PublishOptions::default()
    }
}

#[tokio::test]
async fn test_async_sends_every_message() {
    let sender = Arc::new(MockSender::new());
    let publisher = Publisher::new(Arc::clone(&sender), "test-topic");
    let messages = TestMessage::batch("publisher-test", 3);

    let report = publisher.publish(&messages, &options(SendMode::Async)).await;

    assert_eq!(report, PublishReport::new(3, 3));
    assert!(report.is_complete());

    let sent = sender.sent();
    assert_eq!(sent.len(), 3);
    assert!(sent.iter().all(|r| r.topic == "test-topic"));
    assert!(sent
        .iter()
        .all(|r| r.queue_timeout == Duration::from_millis(5000)));

    let mut keys: Vec<String> = sent.iter().map(|r| r.key.clone()).collect();
    keys.sort();
    let mut expected: Vec<String> = messages.iter().map(|m| m.id().to_string()).collect();
    expected.sort();
    assert_eq!(keys, expected);
}

#[tokio::test]
async fn test_payload_is_message_json() {
    let sender = Arc::new(MockSender::new());
    let publisher = Publisher::new(Arc::clone(&sender), "test-topic");
    let messages = TestMessage::batch("publisher-test", 1);

    publisher.publish(&messages, &options(SendMode::Async)).await;

    let record = &sender.sent()[0];
    let value: serde_json::Value = serde_json::from_str(&record.payload).unwrap();
    assert_eq!(value["id"], record.key);
    assert_eq!(value["source"], "publisher-test");
    assert_eq!(value["data"], messages[0].data());
}

#[tokio::test]
async fn test_async_failures_do_not_stop_batch() {
    let sender = Arc::new(MockSender::failing([1, 3]));
    let publisher = Publisher::new(Arc::clone(&sender), "test-topic");
    let messages = TestMessage::batch("publisher-test", 5);

    let report = publisher.publish(&messages, &options(SendMode::Async)).await;

    assert_eq!(sender.calls(), 5);
    assert_eq!(report.succeeded, 3);
    assert_eq!(report.failed(), 2);
    assert!(!report.is_complete());
}

#[tokio::test]
async fn test_async_panicked_send_counts_as_failure() {
    let sender = Arc::new(MockSender::panicking([0, 2]));
    let publisher = Publisher::new(Arc::clone(&sender), "test-topic");
    let messages = TestMessage::batch("publisher-test", 4);

    let report = tokio::time::timeout(
        Duration::from_secs(5),
        publisher.publish(&messages, &options(SendMode::Async)),
    )
    .await
    .expect("publish hung after a send task panicked");

    assert_eq!(sender.calls(), 4);
    assert_eq!(report, PublishReport::new(4, 2));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_async_large_batch_on_multi_thread_runtime() {
    let sender = Arc::new(MockSender::new());
    let publisher = Publisher::new(Arc::clone(&sender), "test-topic");
    let messages = TestMessage::batch("publisher-test", 200);

    let report = publisher.publish(&messages, &options(SendMode::Async)).await;

    assert_eq!(report, PublishReport::new(200, 200));
    assert_eq!(sender.sent().len(), 200);
}

#[tokio::test]
async fn test_sync_preserves_order() {
    let sender = Arc::new(MockSender::new());
    let publisher = Publisher::new(Arc::clone(&sender), "test-topic");
    let messages = TestMessage::batch("publisher-test", 4);

    let report = publisher.publish(&messages, &options(SendMode::Sync)).await;

    assert!(report.is_complete());
    let keys: Vec<String> = sender.sent().into_iter().map(|r| r.key).collect();
    let expected: Vec<String> = messages.iter().map(|m| m.id().to_string()).collect();
    assert_eq!(keys, expected);
}

#[tokio::test]
async fn test_sync_stops_at_first_failure() {
    let sender = Arc::new(MockSender::failing([1]));
    let publisher = Publisher::new(Arc::clone(&sender), "test-topic");
    let messages = TestMessage::batch("publisher-test", 4);

    let report = publisher.publish(&messages, &options(SendMode::Sync)).await;

    assert_eq!(sender.calls(), 2);
    assert_eq!(report, PublishReport::new(4, 1));
    assert_eq!(report.failed(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_sync_sleeps_between_sends() {
    let sender = Arc::new(MockSender::new());
    let publisher = Publisher::new(Arc::clone(&sender), "test-topic");
    let messages = TestMessage::batch("publisher-test", 3);
    let options = PublishOptions {
        mode: SendMode::Sync,
        interval: Duration::from_secs(2),
        ..PublishOptions::default()
    };

    let started = tokio::time::Instant::now();
    let report = publisher.publish(&messages, &options).await;

    assert!(report.is_complete());
    // Two gaps for three messages, none before the first.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(4), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(5), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_single_message_does_not_sleep() {
    let sender = Arc::new(MockSender::new());
    let publisher = Publisher::new(Arc::clone(&sender), "test-topic");
    let messages = TestMessage::batch("publisher-test", 1);
    let options = PublishOptions {
        mode: SendMode::Sync,
        interval: Duration::from_secs(2),
        ..PublishOptions::default()
    };

    let started = tokio::time::Instant::now();
    publisher.publish(&messages, &options).await;

    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn test_empty_batch_completes_immediately() {
    let sender = Arc::new(MockSender::new());
    let publisher = Publisher::new(Arc::clone(&sender), "test-topic");
    let messages: Vec<TestMessage> = Vec::new();

    let report = publisher.publish(&messages, &options(SendMode::Async)).await;

    assert_eq!(report, PublishReport::new(0, 0));
    assert_eq!(sender.calls(), 0);
    assert_eq!(publisher.topic(), "test-topic");
}

#[tokio::test]
async fn test_latch_releases_only_at_zero() {
    let latch = Arc::new(CountdownLatch::new(3));

    let waiter = {
        let latch = Arc::clone(&latch);
        tokio::spawn(async move { latch.wait().await })
    };

    latch.count_down();
    latch.count_down();
    tokio::task::yield_now().await;
    assert!(!waiter.is_finished());
    assert_eq!(latch.count(), 1);

    latch.count_down();
    tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .expect("waiter was not released")
        .unwrap();

    latch.count_down();
    assert_eq!(latch.count(), 0);
}

#[tokio::test]
async fn test_latch_at_zero_does_not_block() {
    let latch = CountdownLatch::new(0);
    tokio::time::timeout(Duration::from_millis(100), latch.wait())
        .await
        .expect("zero latch blocked");
}

#[tokio::test]
async fn test_tracker_counts_each_outcome_once() {
    let tracker = DeliveryTracker::new(2);

    tracker.record(&Ok(kafka_test_client::Delivery {
        partition: 0,
        offset: 1,
    }));
    assert_eq!(tracker.pending(), 1);

    tracker.record_failure();
    assert_eq!(tracker.pending(), 0);
    assert_eq!(tracker.succeeded(), 1);

    tracker.wait().await;
}
