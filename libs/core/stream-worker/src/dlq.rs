//! Dead Letter Queue (DLQ)
//!
//! Jobs that failed permanently or ran out of retries are appended to the
//! DLQ stream with the error that ended them.

use crate::error::StreamError;
use crate::worker::StreamJob;
use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use tracing::warn;

type StreamEntries = Vec<(String, Vec<(String, String)>)>;

#[derive(Clone)]
pub struct DlqManager {
    redis: ConnectionManager,
    dlq_stream: String,
    max_length: i64,
}

impl DlqManager {
    pub fn new(redis: ConnectionManager, dlq_stream: impl Into<String>) -> Self {
        Self {
            redis,
            dlq_stream: dlq_stream.into(),
            max_length: 10_000,
        }
    }

    pub fn dlq_stream(&self) -> &str {
        &self.dlq_stream
    }

    /// Move a job to the dead letter queue. Returns the DLQ entry ID.
    pub async fn move_to_dlq<J: StreamJob>(
        &self,
        job: &J,
        error: &str,
        original_stream_id: &str,
    ) -> Result<String, StreamError> {
        let entry = DlqEntry {
            job_id: job.job_id(),
            job_data: serde_json::to_value(job)?,
            error: error.to_string(),
            original_stream_id: original_stream_id.to_string(),
            retry_count: job.retry_count(),
            failed_at: Utc::now(),
        };

        let data = serde_json::to_string(&entry)?;
        let mut conn = self.redis.clone();

        let dlq_id: String = redis::cmd("XADD")
            .arg(&self.dlq_stream)
            .arg("MAXLEN")
            .arg("~")
            .arg(self.max_length)
            .arg("*")
            .arg("data")
            .arg(&data)
            .query_async(&mut conn)
            .await?;

        warn!(
            job_id = %entry.job_id,
            dlq_id = %dlq_id,
            error = %error,
            retry_count = entry.retry_count,
            "Moved job to DLQ"
        );

        Ok(dlq_id)
    }

    /// Oldest `count` entries of the DLQ.
    pub async fn list(&self, count: usize) -> Result<Vec<DlqEntry>, StreamError> {
        let mut conn = self.redis.clone();

        let entries: StreamEntries = redis::cmd("XRANGE")
            .arg(&self.dlq_stream)
            .arg("-")
            .arg("+")
            .arg("COUNT")
            .arg(count)
            .query_async(&mut conn)
            .await?;

        Ok(entries
            .into_iter()
            .filter_map(|(_id, fields)| {
                fields
                    .into_iter()
                    .find(|(k, _)| k == "data")
                    .and_then(|(_, data)| serde_json::from_str(&data).ok())
            })
            .collect())
    }
}

/// DLQ entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DlqEntry {
    pub job_id: String,

    /// The job as it was when it failed for the last time
    pub job_data: serde_json::Value,

    pub error: String,

    pub original_stream_id: String,

    pub retry_count: u32,

    pub failed_at: DateTime<Utc>,
}
