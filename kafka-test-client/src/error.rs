//! Error types for the test client.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for test client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while configuring or running the test client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The properties file could not be read.
    #[error("Failed to read properties file '{}': {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The properties file is malformed.
    #[error("Invalid properties at line {line}: {message}")]
    ConfigParse { line: usize, message: String },

    /// Error from the underlying rdkafka library.
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    /// A message was not acknowledged by the broker.
    #[error("Failed to deliver message '{key}' to topic '{topic}': {source}")]
    Delivery {
        topic: String,
        key: String,
        #[source]
        source: rdkafka::error::KafkaError,
    },

    /// Error serializing a message to JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
