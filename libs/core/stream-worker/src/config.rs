//! Worker configuration

use std::time::Duration;

use crate::registry::StreamDef;
use redis::aio::ConnectionManagerConfig;
use uuid::Uuid;

/// Extra time a blocking read may take on top of its BLOCK argument before
/// the connection gives up on the reply.
const RESPONSE_MARGIN: Duration = Duration::from_secs(5);

/// Configuration for the stream worker
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Redis stream name
    pub stream_name: String,

    /// Consumer group name
    pub consumer_group: String,

    /// Unique consumer ID (auto-generated if not provided)
    pub consumer_id: String,

    /// Dead letter queue stream name
    pub dlq_stream: String,

    /// Approximate maximum stream length on XADD
    pub max_length: i64,

    /// Messages read per XREADGROUP
    pub batch_size: usize,

    /// XREADGROUP BLOCK timeout. Also bounds how long stop waits for an idle read.
    pub block_timeout: Duration,

    /// Upper bound for the backoff after Redis errors in the loop
    pub max_backoff: Duration,

    /// Entries pending in the group for at least this long are claimed by
    /// this consumer, on start and periodically while running.
    pub claim_min_idle: Duration,
}

impl WorkerConfig {
    pub fn from_stream_def<S: StreamDef>() -> Self {
        Self {
            stream_name: S::STREAM_NAME.to_string(),
            consumer_group: S::CONSUMER_GROUP.to_string(),
            dlq_stream: S::DLQ_STREAM.to_string(),
            max_length: S::MAX_LENGTH,
            claim_min_idle: Duration::from_millis(S::CLAIM_MIN_IDLE_MS),
            ..Self::default()
        }
    }

    pub fn new(stream_name: impl Into<String>, consumer_group: impl Into<String>) -> Self {
        let stream_name = stream_name.into();
        let domain = stream_name.split(':').next().unwrap_or("stream").to_string();

        Self {
            dlq_stream: format!("{domain}:dlq"),
            stream_name,
            consumer_group: consumer_group.into(),
            consumer_id: format!("worker-{}", Uuid::new_v4()),
            max_length: 100_000,
            batch_size: 10,
            block_timeout: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
            claim_min_idle: Duration::from_secs(30),
        }
    }

    /// Redis connection settings for a worker using this configuration.
    ///
    /// The response timeout covers `block_timeout`, so an idle blocking read
    /// ends with an empty reply instead of a client-side timeout.
    pub fn connection_config(&self) -> ConnectionManagerConfig {
        ConnectionManagerConfig::new().set_response_timeout(Some(self.response_timeout()))
    }

    pub fn response_timeout(&self) -> Duration {
        self.block_timeout + RESPONSE_MARGIN
    }

    pub fn with_consumer_id(mut self, id: impl Into<String>) -> Self {
        self.consumer_id = id.into();
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    pub fn with_block_timeout(mut self, timeout: Duration) -> Self {
        self.block_timeout = timeout;
        self
    }

    pub fn with_claim_min_idle(mut self, idle: Duration) -> Self {
        self.claim_min_idle = idle;
        self
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self::new("stream:jobs", "workers")
    }
}
