//! Kafka delivery check client.
//!
//! Reads a properties file, publishes a batch of synthetic JSON test
//! messages to one topic and waits until every message has been
//! acknowledged or has failed.
//!
//! # Features
//!
//! - Java-style properties files, shared between the client and librdkafka
//! - Publisher-only keys stripped before the producer is created
//! - Async mode (all sends in flight, countdown wait) and sync mode
//! - Integrated tracing
//!
//! # Example
//!
//! ```no_run
//! use kafka_test_client::{run, TestClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = TestClientConfig::load("client.properties")?;
//!     let report = run(&config).await?;
//!
//!     assert!(report.is_complete());
//!     Ok(())
//! }
//! ```

mod cli;
mod client;
mod config;
mod error;
mod latch;
mod producer;
mod properties;
mod publisher;

pub use cli::Cli;
pub use client::{publish_and_close, run, CLOSE_TIMEOUT};
pub use config::{
    ProducerSettings, PublishOptions, SendMode, TestClientConfig, CLIENT_SOURCE,
    DEFAULT_MAX_BLOCK_MS, DEFAULT_MESSAGE_COUNT, DEFAULT_TOPIC_NAME, PUBLISHER_KEYS,
};
pub use error::{ClientError, Result};
pub use latch::CountdownLatch;
pub use producer::{Delivery, Producer, RecordSender};
pub use properties::Properties;
pub use publisher::{DeliveryTracker, PublishReport, Publisher};

/// Re-export the message types for convenience
pub use test_message::{KafkaMessage, TestMessage};
