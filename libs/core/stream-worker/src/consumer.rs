//! Consumer-group reads and acknowledgements.

use crate::config::WorkerConfig;
use crate::error::StreamError;
use crate::event::StreamEvent;
use crate::worker::StreamJob;
use redis::aio::ConnectionManager;
use redis::streams::StreamAutoClaimReply;
use redis::{RedisResult, Value};
use tracing::{debug, info, warn};

type StreamEntries = Vec<(String, Vec<(String, String)>)>;
type StreamReadReply = Vec<(String, StreamEntries)>;

/// Field name holding the JSON-encoded job in every stream entry
pub(crate) const JOB_FIELD: &str = "job";

/// Cursor that starts, and marks the end of, a pending-list scan.
pub const CLAIM_START: &str = "0-0";

/// Reads jobs for one consumer of a consumer group
#[derive(Clone)]
pub struct StreamConsumer {
    redis: ConnectionManager,
    config: WorkerConfig,
}

impl StreamConsumer {
    pub fn new(redis: ConnectionManager, config: WorkerConfig) -> Self {
        Self { redis, config }
    }

    pub fn redis(&self) -> ConnectionManager {
        self.redis.clone()
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Create the consumer group (and the stream) unless it already exists.
    pub async fn ensure_consumer_group(&self) -> Result<(), StreamError> {
        let mut conn = self.redis.clone();

        let result: RedisResult<()> = redis::cmd("XGROUP")
            .arg("CREATE")
            .arg(&self.config.stream_name)
            .arg(&self.config.consumer_group)
            .arg("0")
            .arg("MKSTREAM")
            .query_async(&mut conn)
            .await;

        match result {
            Ok(()) => {
                info!(
                    stream = %self.config.stream_name,
                    group = %self.config.consumer_group,
                    "Created consumer group"
                );
                Ok(())
            }
            Err(e) if e.to_string().contains("BUSYGROUP") => {
                debug!(
                    stream = %self.config.stream_name,
                    group = %self.config.consumer_group,
                    "Consumer group already exists"
                );
                Ok(())
            }
            Err(e) => Err(StreamError::Redis(e)),
        }
    }

    /// Claim entries that have been pending in the group for at least
    /// `claim_min_idle`, whichever consumer they were delivered to.
    ///
    /// Scans from `cursor` (start with [`CLAIM_START`]) and returns the
    /// cursor for the next call, which is [`CLAIM_START`] once the whole
    /// pending list has been scanned.
    pub async fn claim_idle<J: StreamJob>(
        &self,
        cursor: &str,
    ) -> Result<(String, Vec<StreamEvent<J>>), StreamError> {
        let mut conn = self.redis.clone();

        let reply: StreamAutoClaimReply = redis::cmd("XAUTOCLAIM")
            .arg(&self.config.stream_name)
            .arg(&self.config.consumer_group)
            .arg(&self.config.consumer_id)
            .arg(self.config.claim_min_idle.as_millis() as u64)
            .arg(cursor)
            .arg("COUNT")
            .arg(self.config.batch_size)
            .query_async(&mut conn)
            .await?;

        if !reply.deleted_ids.is_empty() {
            debug!(
                count = reply.deleted_ids.len(),
                stream = %self.config.stream_name,
                "Pending entries no longer in the stream"
            );
        }

        let entries = reply.claimed.into_iter().map(|entry| {
            let fields = entry
                .map
                .iter()
                .filter_map(|(key, value)| field_text(value).map(|text| (key.clone(), text)))
                .collect();
            (entry.id, fields)
        });
        let events = self.decode(entries).await?;

        Ok((reply.next_stream_id, events))
    }

    /// New entries, blocking up to `block_timeout` when the stream is idle.
    pub async fn read_new<J: StreamJob>(&self) -> Result<Vec<StreamEvent<J>>, StreamError> {
        let mut conn = self.redis.clone();

        let reply: Option<StreamReadReply> = redis::cmd("XREADGROUP")
            .arg("GROUP")
            .arg(&self.config.consumer_group)
            .arg(&self.config.consumer_id)
            .arg("COUNT")
            .arg(self.config.batch_size)
            .arg("BLOCK")
            .arg(self.config.block_timeout.as_millis() as u64)
            .arg("STREAMS")
            .arg(&self.config.stream_name)
            .arg(">")
            .query_async(&mut conn)
            .await?;

        match reply {
            Some(streams) => {
                self.decode(streams.into_iter().flat_map(|(_stream, entries)| entries))
                    .await
            }
            None => Ok(vec![]),
        }
    }

    pub async fn ack(&self, stream_id: &str) -> Result<(), StreamError> {
        let mut conn = self.redis.clone();

        let _: i64 = redis::cmd("XACK")
            .arg(&self.config.stream_name)
            .arg(&self.config.consumer_group)
            .arg(stream_id)
            .query_async(&mut conn)
            .await?;

        debug!(stream_id = %stream_id, "Acknowledged message");
        Ok(())
    }

    /// Decode entries into jobs. Entries without a decodable job are
    /// acknowledged and dropped so they are not redelivered forever.
    async fn decode<J: StreamJob>(
        &self,
        entries: impl IntoIterator<Item = (String, Vec<(String, String)>)>,
    ) -> Result<Vec<StreamEvent<J>>, StreamError> {
        let mut events = Vec::new();

        for (stream_id, fields) in entries {
            match decode_job::<J>(&fields) {
                Ok(job) => events.push(StreamEvent::new(stream_id, job)),
                Err(reason) => {
                    warn!(
                        stream_id = %stream_id,
                        stream = %self.config.stream_name,
                        reason = %reason,
                        "Dropping malformed stream entry"
                    );
                    self.ack(&stream_id).await?;
                }
            }
        }

        Ok(events)
    }
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::BulkString(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        Value::SimpleString(text) => Some(text.clone()),
        _ => None,
    }
}

fn decode_job<J: StreamJob>(fields: &[(String, String)]) -> Result<J, String> {
    let json = fields
        .iter()
        .find(|(k, _)| k == JOB_FIELD)
        .map(|(_, v)| v.as_str())
        .ok_or_else(|| format!("missing '{JOB_FIELD}' field"))?;

    serde_json::from_str(json).map_err(|e| e.to_string())
}
