use clap::Parser;
use std::path::PathBuf;

/// Publishes test messages to a Kafka topic and waits for delivery.
#[derive(Parser, Debug)]
#[command(name = "kafka-test-client", version, about, long_about = None)]
pub struct Cli {
    /// Path to the properties file
    pub properties: PathBuf,
}
