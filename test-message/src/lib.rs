//! Synthetic Kafka test messages.
//!
//! This crate provides the `KafkaMessage` trait implemented by anything the
//! test client can publish, and the `TestMessage` payload itself: a random
//! identifier, a random alphanumeric string and the time it was built.

mod random;
mod timestamp;

pub use random::random_string;
pub use timestamp::{iso_timestamp, local_iso_timestamp};

use serde::Serialize;
use uuid::Uuid;

/// Length of the random `data` field.
pub const DATA_LENGTH: usize = 10;

/// Trait for types that can be sent as Kafka messages.
///
/// Messages are encoded as JSON, and the value returned by `key` becomes the
/// record key, so every message needs one.
///
/// # Example
///
/// ```
/// use test_message::KafkaMessage;
/// use serde::Serialize;
///
/// #[derive(Debug, Serialize)]
/// struct Ping {
///     id: String,
/// }
///
/// impl KafkaMessage for Ping {
///     fn key(&self) -> &str {
///         &self.id
///     }
/// }
/// ```
pub trait KafkaMessage: Serialize + Send + Sync {
    /// The record key used when this message is produced.
    fn key(&self) -> &str;

    /// Encodes the message as a JSON string.
    fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// A single test message.
///
/// Fields are serialized in declaration order, so the JSON form is always
/// `{"id":..,"source":..,"data":..,"timestamp":..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestMessage {
    id: String,
    source: String,
    data: String,
    timestamp: String,
}

impl TestMessage {
    /// Builds a fresh message stamped with the current local time.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            source: source.into(),
            data: random_string(DATA_LENGTH),
            timestamp: local_iso_timestamp(),
        }
    }

    /// Builds exactly `count` messages from the same source.
    pub fn batch(source: &str, count: usize) -> Vec<Self> {
        (0..count).map(|_| Self::new(source)).collect()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

impl KafkaMessage for TestMessage {
    fn key(&self) -> &str {
        &self.id
    }
}
