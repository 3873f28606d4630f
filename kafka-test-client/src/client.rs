//! One full test client run: build, publish, close.

use crate::config::TestClientConfig;
use crate::error::Result;
use crate::producer::{Producer, RecordSender};
use crate::publisher::{PublishReport, Publisher};
use std::sync::Arc;
use std::time::Duration;
use test_message::{KafkaMessage, TestMessage};
use tracing::{info, warn};

/// Upper bound for flushing the producer on close.
pub const CLOSE_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the configured batch and publishes it through a new producer.
///
/// # Errors
///
/// Returns an error if the producer cannot be created. Delivery failures are
/// reported through the returned `PublishReport`.
pub async fn run(config: &TestClientConfig) -> Result<PublishReport> {
    let messages = TestMessage::batch(&config.source, config.message_count);
    let producer = Arc::new(Producer::from_settings(&config.producer)?);

    Ok(publish_and_close(config, producer, &messages).await)
}

/// Publishes `messages` and then closes `sender`, whatever the outcome.
pub async fn publish_and_close<S, M>(
    config: &TestClientConfig,
    sender: Arc<S>,
    messages: &[M],
) -> PublishReport
where
    S: RecordSender,
    M: KafkaMessage,
{
    let publisher = Publisher::new(Arc::clone(&sender), config.topic_name.as_str());
    let report = publisher.publish(messages, &config.publish_options()).await;

    if let Err(e) = sender.close(CLOSE_TIMEOUT) {
        warn!("Failed to close producer cleanly: {}", e);
    }

    info!("Successfully produced {} message(s)", report.succeeded);
    report
}
