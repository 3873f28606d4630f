//! Kafka producer used by the test client.

use crate::config::ProducerSettings;
use crate::error::{ClientError, Result};
use rdkafka::producer::{FutureProducer, FutureRecord, Producer as RdProducer};
use rdkafka::util::Timeout;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

/// Broker acknowledgment for a produced record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub partition: i32,
    pub offset: i64,
}

/// Something that can produce string records and report their delivery.
///
/// The publisher only talks to Kafka through this trait, so it can be driven
/// by a real `Producer` or by an in-memory stand-in.
pub trait RecordSender: Send + Sync + 'static {
    /// Sends one record and resolves once the broker has acknowledged it.
    ///
    /// `queue_timeout` bounds how long the send may wait for space in the
    /// local producer queue.
    fn send(
        &self,
        topic: &str,
        key: &str,
        payload: &str,
        queue_timeout: Duration,
    ) -> impl Future<Output = Result<Delivery>> + Send;

    /// Flushes outstanding records and releases the client.
    fn close(&self, timeout: Duration) -> Result<()>;
}

/// Kafka producer for string keys and JSON string payloads.
///
/// # Example
///
/// ```no_run
/// use kafka_test_client::{Producer, Properties, RecordSender, TestClientConfig};
/// use std::time::Duration;
///
/// # async fn example() -> anyhow::Result<()> {
/// let properties: Properties = [("bootstrap.servers", "localhost:9092")].into_iter().collect();
/// let config = TestClientConfig::from_properties(properties);
///
/// let producer = Producer::from_settings(&config.producer)?;
/// producer
///     .send(&config.topic_name, "key", "{}", config.queue_timeout)
///     .await?;
/// producer.close(Duration::from_secs(5))?;
/// # Ok(())
/// # }
/// ```
pub struct Producer {
    inner: FutureProducer,
}

impl Producer {
    /// Creates a producer from the passthrough settings.
    ///
    /// # Errors
    ///
    /// Returns an error if librdkafka rejects the configuration.
    pub fn from_settings(settings: &ProducerSettings) -> Result<Self> {
        info!(
            "Creating Kafka producer with brokers: {}",
            settings.get("bootstrap.servers").unwrap_or("<unset>")
        );

        let producer: FutureProducer = settings.client_config().create()?;
        Ok(Self { inner: producer })
    }
}

impl RecordSender for Producer {
    async fn send(
        &self,
        topic: &str,
        key: &str,
        payload: &str,
        queue_timeout: Duration,
    ) -> Result<Delivery> {
        debug!(
            "Sending message to topic '{}' with key '{}' ({} bytes)",
            topic,
            key,
            payload.len()
        );

        let record = FutureRecord::to(topic).key(key).payload(payload);

        match self.inner.send(record, Timeout::After(queue_timeout)).await {
            Ok((partition, offset)) => {
                debug!(
                    "Message sent successfully to topic '{}' with key '{}' (partition: {}, offset: {})",
                    topic, key, partition, offset
                );
                Ok(Delivery { partition, offset })
            }
            Err((kafka_err, _msg)) => {
                debug!(
                    "Failed to send message to topic '{}' with key '{}': {}",
                    topic, key, kafka_err
                );
                Err(ClientError::Delivery {
                    topic: topic.to_string(),
                    key: key.to_string(),
                    source: kafka_err,
                })
            }
        }
    }

    fn close(&self, timeout: Duration) -> Result<()> {
        debug!("Flushing pending messages");
        RdProducer::flush(&self.inner, Timeout::After(timeout))?;
        Ok(())
    }
}
