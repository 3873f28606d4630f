//! Test client configuration.
//!
//! A single properties file carries both the publisher's own settings and
//! the librdkafka producer settings. `TestClientConfig::from_properties`
//! separates the two: publisher keys are read and removed, and everything
//! left is forwarded to the producer untouched.

use crate::error::Result;
use crate::properties::Properties;
use rdkafka::ClientConfig;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info, warn};

/// Topic used when `topic.name` is absent or empty.
pub const DEFAULT_TOPIC_NAME: &str = "KafkaTestClient";

/// Default for `message.count`, also its lower bound.
pub const DEFAULT_MESSAGE_COUNT: usize = 1;

/// Default for `max.block.ms`.
pub const DEFAULT_MAX_BLOCK_MS: u64 = 5000;

/// Identity written into the `source` field of every message.
pub const CLIENT_SOURCE: &str = "kafka_test_client::KafkaTestClient";

const TOPIC_NAME: &str = "topic.name";
const MESSAGE_COUNT: &str = "message.count";
const SEND_MODE: &str = "send.mode";
const SEND_INTERVAL_MS: &str = "send.interval.ms";
const MAX_BLOCK_MS: &str = "max.block.ms";

/// Keys that are never passed to the producer.
///
/// Serializer classes are dropped as well: records are always produced as
/// UTF-8 strings and librdkafka rejects unknown properties.
pub const PUBLISHER_KEYS: &[&str] = &[
    TOPIC_NAME,
    "schema.registry.url",
    "basic.auth.user.info",
    "session.timeout.ms",
    MESSAGE_COUNT,
    SEND_MODE,
    SEND_INTERVAL_MS,
    MAX_BLOCK_MS,
    "key.serializer",
    "value.serializer",
];

/// How the publisher waits for acknowledgments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SendMode {
    /// Send every message, then wait for all acknowledgments.
    #[default]
    Async,
    /// Wait for each acknowledgment before sending the next message.
    Sync,
}

impl FromStr for SendMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "async" => Ok(Self::Async),
            "sync" => Ok(Self::Sync),
            other => Err(format!("unknown send mode '{}'", other)),
        }
    }
}

impl fmt::Display for SendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Async => f.write_str("async"),
            Self::Sync => f.write_str("sync"),
        }
    }
}

/// Properties forwarded verbatim to the librdkafka producer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProducerSettings {
    properties: Properties,
}

impl ProducerSettings {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter()
    }

    /// Builds the rdkafka client configuration.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        for (key, value) in self.properties.iter() {
            config.set(key, value);
        }
        config
    }
}

/// Publisher options needed once messages are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishOptions {
    pub mode: SendMode,
    /// Pause between consecutive sends in `Sync` mode.
    pub interval: Duration,
    /// Maximum time a send waits for space in the producer queue.
    pub queue_timeout: Duration,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            mode: SendMode::Async,
            interval: Duration::ZERO,
            queue_timeout: Duration::from_millis(DEFAULT_MAX_BLOCK_MS),
        }
    }
}

/// Fully resolved test client configuration.
#[derive(Debug, Clone)]
pub struct TestClientConfig {
    pub topic_name: String,
    /// Number of messages to send; never less than one.
    pub message_count: usize,
    pub send_mode: SendMode,
    pub send_interval: Duration,
    pub queue_timeout: Duration,
    pub producer: ProducerSettings,
    pub source: String,
}

impl TestClientConfig {
    /// Loads the configuration from a properties file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed. Invalid
    /// values for individual keys are logged and replaced by defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let properties = Properties::load(path)?;
        Ok(Self::from_properties(properties))
    }

    /// Splits `properties` into publisher settings and producer settings.
    pub fn from_properties(mut properties: Properties) -> Self {
        let topic_name = properties
            .get(TOPIC_NAME)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_TOPIC_NAME)
            .to_string();
        info!("topic.name = [{}]", topic_name);

        let message_count = parse_message_count(properties.get(MESSAGE_COUNT));
        info!("message.count = [{}]", message_count);

        let send_mode = match properties.get(SEND_MODE) {
            None => SendMode::default(),
            Some(value) => value.parse::<SendMode>().unwrap_or_else(|e| {
                warn!("Invalid '{}': {}, using '{}'", SEND_MODE, e, SendMode::default());
                SendMode::default()
            }),
        };

        let send_interval = Duration::from_millis(parse_millis(
            properties.get(SEND_INTERVAL_MS),
            SEND_INTERVAL_MS,
            0,
        ));
        let queue_timeout = Duration::from_millis(parse_millis(
            properties.get(MAX_BLOCK_MS),
            MAX_BLOCK_MS,
            DEFAULT_MAX_BLOCK_MS,
        ));

        for key in PUBLISHER_KEYS {
            properties.remove(key);
        }

        Self {
            topic_name,
            message_count,
            send_mode,
            send_interval,
            queue_timeout,
            producer: ProducerSettings { properties },
            source: CLIENT_SOURCE.to_string(),
        }
    }

    pub fn publish_options(&self) -> PublishOptions {
        PublishOptions {
            mode: self.send_mode,
            interval: self.send_interval,
            queue_timeout: self.queue_timeout,
        }
    }
}

fn parse_message_count(value: Option<&str>) -> usize {
    let Some(value) = value else {
        return DEFAULT_MESSAGE_COUNT;
    };

    match value.parse::<i32>() {
        Ok(count) => usize::try_from(count)
            .ok()
            .filter(|&count| count >= DEFAULT_MESSAGE_COUNT)
            .unwrap_or(DEFAULT_MESSAGE_COUNT),
        Err(e) => {
            error!("Invalid '{}' value '{}': {}", MESSAGE_COUNT, value, e);
            DEFAULT_MESSAGE_COUNT
        }
    }
}

fn parse_millis(value: Option<&str>, key: &str, default: u64) -> u64 {
    match value.map(str::parse::<u64>) {
        None => default,
        Some(Ok(millis)) => millis,
        Some(Err(e)) => {
            warn!("Invalid '{}': {}, using {}", key, e, default);
            default
        }
    }
}
