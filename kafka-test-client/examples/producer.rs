//! Example publishing a custom message type through the test client library.
//!
//! This example shows how to:
//! - Implement the KafkaMessage trait for your own payload
//! - Build a producer from properties
//! - Publish a batch and inspect the delivery report
//!
//! To run this example:
//! ```bash
//! cargo run --example producer
//! ```
//!
//! Make sure you have a Kafka broker running on localhost:9092.

use kafka_test_client::{
    publish_and_close, KafkaMessage, Producer, Properties, TestClientConfig,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, Level};

/// Example heartbeat message keyed by host name
#[derive(Debug, Serialize)]
struct Heartbeat {
    host: String,
    sequence: u32,
}

impl KafkaMessage for Heartbeat {
    fn key(&self) -> &str {
        &self.host
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let brokers = std::env::var("KAFKA_BROKERS")
        .unwrap_or_else(|_| "localhost:9092".to_string());

    let properties: Properties = [
        ("bootstrap.servers", brokers.as_str()),
        ("topic.name", "heartbeats"),
        ("send.mode", "sync"),
        ("send.interval.ms", "100"),
    ]
    .into_iter()
    .collect();
    let config = TestClientConfig::from_properties(properties);

    let producer = Arc::new(Producer::from_settings(&config.producer)?);

    let messages: Vec<Heartbeat> = (1..=5)
        .map(|sequence| Heartbeat {
            host: "example-host".to_string(),
            sequence,
        })
        .collect();

    let report = publish_and_close(&config, producer, &messages).await;
    info!(
        "Delivered {} of {} heartbeat(s)",
        report.succeeded, report.requested
    );

    Ok(())
}
