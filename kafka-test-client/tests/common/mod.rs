//! In-memory `RecordSender` shared by the integration tests.

#![allow(dead_code)]

use kafka_test_client::{ClientError, Delivery, RecordSender, Result};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentRecord {
    pub topic: String,
    pub key: String,
    pub payload: String,
    pub queue_timeout: Duration,
}

/// Acknowledges every record except the calls listed in `fail_calls`.
#[derive(Default)]
pub struct MockSender {
    fail_calls: HashSet<usize>,
    panic_calls: HashSet<usize>,
    calls: AtomicUsize,
    sent: Mutex<Vec<SentRecord>>,
    closed: AtomicBool,
    fail_close: bool,
}

impl MockSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the given zero-based send calls.
    pub fn failing(calls: impl IntoIterator<Item = usize>) -> Self {
        Self {
            fail_calls: calls.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Panics inside the given zero-based send calls.
    pub fn panicking(calls: impl IntoIterator<Item = usize>) -> Self {
        Self {
            panic_calls: calls.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn with_failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn sent(&self) -> Vec<SentRecord> {
        self.sent.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl RecordSender for MockSender {
    async fn send(
        &self,
        topic: &str,
        key: &str,
        payload: &str,
        queue_timeout: Duration,
    ) -> Result<Delivery> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        self.sent.lock().unwrap().push(SentRecord {
            topic: topic.to_string(),
            key: key.to_string(),
            payload: payload.to_string(),
            queue_timeout,
        });

        if self.panic_calls.contains(&call) {
            panic!("send call {call} panicked");
        }

        if self.fail_calls.contains(&call) {
            return Err(ClientError::Delivery {
                topic: topic.to_string(),
                key: key.to_string(),
                source: rdkafka::error::KafkaError::MessageProduction(
                    rdkafka::types::RDKafkaErrorCode::MessageTimedOut,
                ),
            });
        }

        Ok(Delivery {
            partition: 0,
            offset: call as i64,
        })
    }

    fn close(&self, _timeout: Duration) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        if self.fail_close {
            return Err(ClientError::Kafka(rdkafka::error::KafkaError::Flush(
                rdkafka::types::RDKafkaErrorCode::OperationTimedOut,
            )));
        }
        Ok(())
    }
}
