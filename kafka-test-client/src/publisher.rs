//! Sends a batch of messages and waits for their acknowledgments.

use crate::config::{PublishOptions, SendMode};
use crate::error::{ClientError, Result};
use crate::latch::CountdownLatch;
use crate::producer::{Delivery, RecordSender};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use test_message::KafkaMessage;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// Outcome of a publish run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishReport {
    pub requested: usize,
    pub succeeded: usize,
}

impl PublishReport {
    pub fn new(requested: usize, succeeded: usize) -> Self {
        Self {
            requested,
            succeeded,
        }
    }

    /// Messages that were not confirmed, including ones never sent.
    pub fn failed(&self) -> usize {
        self.requested.saturating_sub(self.succeeded)
    }

    /// True when every requested message was acknowledged.
    pub fn is_complete(&self) -> bool {
        self.succeeded == self.requested
    }
}

/// Collects per-message outcomes for in-flight sends.
///
/// Every recorded outcome counts the latch down exactly once, whether the
/// send succeeded or not.
#[derive(Debug)]
pub struct DeliveryTracker {
    latch: CountdownLatch,
    succeeded: AtomicUsize,
}

impl DeliveryTracker {
    pub fn new(expected: usize) -> Self {
        Self {
            latch: CountdownLatch::new(expected),
            succeeded: AtomicUsize::new(0),
        }
    }

    pub fn record(&self, result: &Result<Delivery>) {
        match result {
            Ok(delivery) => {
                debug!(
                    "Message acknowledged (partition: {}, offset: {})",
                    delivery.partition, delivery.offset
                );
                self.succeeded.fetch_add(1, Ordering::AcqRel);
            }
            Err(e) => error!("Exception producing message: {}", e),
        }
        self.latch.count_down();
    }

    /// Records a message that failed before it could be sent.
    pub fn record_failure(&self) {
        self.latch.count_down();
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded.load(Ordering::Acquire)
    }

    /// Outcomes still outstanding.
    pub fn pending(&self) -> usize {
        self.latch.count()
    }

    pub async fn wait(&self) {
        self.latch.wait().await;
    }
}

/// One outstanding send on a `DeliveryTracker`.
///
/// Dropping it without `complete`, for example when the send task panics,
/// counts the message as failed so the tracker's waiter is still released.
struct PendingDelivery {
    tracker: Arc<DeliveryTracker>,
    completed: bool,
}

impl PendingDelivery {
    fn new(tracker: Arc<DeliveryTracker>) -> Self {
        Self {
            tracker,
            completed: false,
        }
    }

    fn complete(mut self, result: &Result<Delivery>) {
        self.completed = true;
        self.tracker.record(result);
    }
}

impl Drop for PendingDelivery {
    fn drop(&mut self) {
        if !self.completed {
            error!("Send task ended without a delivery result");
            self.tracker.record_failure();
        }
    }
}

/// Publishes messages to one topic through a `RecordSender`.
pub struct Publisher<S> {
    sender: Arc<S>,
    topic: String,
}

impl<S: RecordSender> Publisher<S> {
    pub fn new(sender: Arc<S>, topic: impl Into<String>) -> Self {
        Self {
            sender,
            topic: topic.into(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Sends `messages` and waits until each one has been acknowledged or
    /// has failed.
    pub async fn publish<M: KafkaMessage>(
        &self,
        messages: &[M],
        options: &PublishOptions,
    ) -> PublishReport {
        match options.mode {
            SendMode::Async => self.publish_async(messages, options.queue_timeout).await,
            SendMode::Sync => {
                self.publish_sync(messages, options.interval, options.queue_timeout)
                    .await
            }
        }
    }

    /// All sends are in flight at once; a failure does not stop the others.
    async fn publish_async<M: KafkaMessage>(
        &self,
        messages: &[M],
        queue_timeout: Duration,
    ) -> PublishReport {
        let tracker = Arc::new(DeliveryTracker::new(messages.len()));

        for message in messages {
            let payload = match encode(message) {
                Ok(payload) => payload,
                Err(e) => {
                    error!("Failed to encode message '{}': {}", message.key(), e);
                    tracker.record_failure();
                    continue;
                }
            };

            info!("Producing message = [{}]", payload);

            let sender = Arc::clone(&self.sender);
            let tracker = Arc::clone(&tracker);
            let topic = self.topic.clone();
            let key = message.key().to_string();

            tokio::spawn(async move {
                let pending = PendingDelivery::new(tracker);
                let result = sender.send(&topic, &key, &payload, queue_timeout).await;
                pending.complete(&result);
            });
        }

        tracker.wait().await;
        PublishReport::new(messages.len(), tracker.succeeded())
    }

    /// Each send is awaited before the next; the first failure ends the run.
    async fn publish_sync<M: KafkaMessage>(
        &self,
        messages: &[M],
        interval: Duration,
        queue_timeout: Duration,
    ) -> PublishReport {
        let mut succeeded = 0;

        for (index, message) in messages.iter().enumerate() {
            if index > 0 && !interval.is_zero() {
                sleep(interval).await;
            }

            let payload = match encode(message) {
                Ok(payload) => payload,
                Err(e) => {
                    error!("Failed to encode message '{}': {}", message.key(), e);
                    break;
                }
            };

            info!("Producing message = [{}]", payload);

            match self
                .sender
                .send(&self.topic, message.key(), &payload, queue_timeout)
                .await
            {
                Ok(delivery) => {
                    debug!(
                        "Message acknowledged (partition: {}, offset: {})",
                        delivery.partition, delivery.offset
                    );
                    succeeded += 1;
                }
                Err(e) => {
                    error!("Exception producing message: {}", e);
                    break;
                }
            }
        }

        PublishReport::new(messages.len(), succeeded)
    }
}

fn encode<M: KafkaMessage>(message: &M) -> Result<String> {
    message
        .to_json()
        .map_err(|e| ClientError::Serialization(e.to_string()))
}
