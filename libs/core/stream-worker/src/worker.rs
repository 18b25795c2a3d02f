//! Job traits and the generic worker loop.

use crate::config::WorkerConfig;
use crate::consumer::{CLAIM_START, StreamConsumer};
use crate::dlq::DlqManager;
use crate::error::StreamError;
use crate::event::StreamEvent;
use crate::metrics;
use crate::producer::StreamProducer;
use async_trait::async_trait;
use database::common::RetryConfig;
use lifecycle::ShutdownSignal;
use redis::aio::ConnectionManager;
use serde::{Serialize, de::DeserializeOwned};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// A job payload carried in a stream entry.
///
/// ```rust,ignore
/// #[derive(Clone, Serialize, Deserialize)]
/// struct EmailJob {
///     id: Uuid,
///     to_email: String,
///     retry_count: u32,
/// }
///
/// impl StreamJob for EmailJob {
///     fn job_id(&self) -> String {
///         self.id.to_string()
///     }
///
///     fn retry_count(&self) -> u32 {
///         self.retry_count
///     }
///
///     fn with_retry(&self) -> Self {
///         Self {
///             retry_count: self.retry_count + 1,
///             ..self.clone()
///         }
///     }
/// }
/// ```
pub trait StreamJob: Serialize + DeserializeOwned + Send + Sync + Clone + 'static {
    fn job_id(&self) -> String;

    fn retry_count(&self) -> u32;

    /// Copy of the job with its retry count incremented.
    fn with_retry(&self) -> Self;

    /// Attempts allowed after the first one before the job is dead-lettered.
    fn max_retries(&self) -> u32 {
        3
    }
}

/// Executes jobs of type `J`.
#[async_trait]
pub trait StreamProcessor<J: StreamJob>: Send + Sync + 'static {
    /// `Err` sends the job to retry or to the DLQ depending on its category.
    async fn process(&self, job: &J) -> Result<(), StreamError>;

    fn name(&self) -> &'static str;
}

/// Reads jobs from one consumer group and hands them to a processor, one at
/// a time.
pub struct StreamWorker<J, P>
where
    J: StreamJob,
    P: StreamProcessor<J>,
{
    consumer: StreamConsumer,
    producer: StreamProducer,
    dlq: DlqManager,
    processor: Arc<P>,
    backoff: RetryConfig,
    _phantom: PhantomData<J>,
}

impl<J, P> StreamWorker<J, P>
where
    J: StreamJob,
    P: StreamProcessor<J>,
{
    pub fn new(redis: ConnectionManager, processor: Arc<P>, config: WorkerConfig) -> Self {
        let producer = StreamProducer::new(redis.clone(), config.stream_name.clone())
            .with_max_length(config.max_length);
        let dlq = DlqManager::new(redis.clone(), config.dlq_stream.clone());
        let backoff = RetryConfig::new()
            .with_initial_delay(500)
            .with_max_delay(config.max_backoff.as_millis() as u64);

        Self {
            consumer: StreamConsumer::new(redis, config),
            producer,
            dlq,
            processor,
            backoff,
            _phantom: PhantomData,
        }
    }

    pub fn consumer(&self) -> &StreamConsumer {
        &self.consumer
    }

    fn stream_name(&self) -> &str {
        &self.consumer.config().stream_name
    }

    /// Process jobs until `stop` fires.
    ///
    /// Stop is checked between jobs and after every read, so an idle worker
    /// notices it within the read block timeout and a running job is always
    /// finished. Entries left pending by a stopped or crashed consumer are
    /// claimed once they have been idle for `claim_min_idle`: on start and
    /// then every `claim_min_idle` while running. Job failures and Redis
    /// errors are logged, never returned.
    pub async fn run(&self, stop: &ShutdownSignal) {
        let config = self.consumer.config();
        info!(
            consumer_id = %config.consumer_id,
            stream = %config.stream_name,
            group = %config.consumer_group,
            processor = %self.processor.name(),
            claim_min_idle_ms = config.claim_min_idle.as_millis() as u64,
            "Starting stream worker"
        );

        self.recover_idle(stop).await;
        let mut last_sweep = Instant::now();
        let mut consecutive_errors: u32 = 0;

        while !stop.is_triggered() {
            if last_sweep.elapsed() >= config.claim_min_idle {
                self.recover_idle(stop).await;
                last_sweep = Instant::now();
            }

            match self.consumer.read_new::<J>().await {
                Ok(events) => {
                    if consecutive_errors > 0 {
                        info!(consecutive_errors, "Redis recovered");
                        consecutive_errors = 0;
                    }
                    self.process_events(events, stop).await;
                }
                Err(e) => {
                    consecutive_errors += 1;
                    let delay = self.backoff.delay_for(consecutive_errors);
                    warn!(
                        error = %e,
                        consecutive_errors,
                        backoff_ms = delay.as_millis() as u64,
                        "Failed to read from stream, backing off"
                    );

                    tokio::select! {
                        _ = stop.triggered() => {}
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }

        info!(stream = %self.stream_name(), "Stream worker stopped");
    }

    /// Claim and process every entry of the group's pending list that has
    /// been idle long enough, one batch at a time.
    async fn recover_idle(&self, stop: &ShutdownSignal) {
        let mut cursor = CLAIM_START.to_string();

        while !stop.is_triggered() {
            let (next, events) = match self.consumer.claim_idle::<J>(&cursor).await {
                Ok(claimed) => claimed,
                Err(e) => {
                    warn!(error = %e, "Failed to claim idle pending jobs");
                    return;
                }
            };

            if !events.is_empty() {
                info!(
                    count = events.len(),
                    stream = %self.stream_name(),
                    "Claimed idle pending jobs"
                );
                metrics::jobs_claimed(self.stream_name(), events.len());
                self.process_events(events, stop).await;
            }

            if next == CLAIM_START {
                return;
            }
            cursor = next;
        }
    }

    async fn process_events(&self, events: Vec<StreamEvent<J>>, stop: &ShutdownSignal) {
        for event in events {
            // Unprocessed entries stay pending until a later sweep claims them.
            if stop.is_triggered() {
                break;
            }
            self.process_event(&event).await;
        }
    }

    /// Run one job and settle its entry: ack on success, otherwise re-queue or
    /// dead-letter, then ack.
    pub async fn process_event(&self, event: &StreamEvent<J>) {
        let stream = self.stream_name();
        debug!(
            stream_id = %event.stream_id,
            job_id = %event.job_id(),
            age_ms = event.age_ms(),
            "Processing job"
        );

        let started = Instant::now();
        match self.processor.process(&event.job).await {
            Ok(()) => {
                metrics::job_processed(stream, started.elapsed());
                if let Err(e) = self.consumer.ack(&event.stream_id).await {
                    error!(stream_id = %event.stream_id, error = %e, "Failed to ACK message");
                }
            }
            Err(e) => {
                metrics::job_failed(stream, e.category());
                warn!(
                    stream_id = %event.stream_id,
                    job_id = %event.job_id(),
                    retry_count = event.job.retry_count(),
                    error = %e,
                    "Job processing failed"
                );

                if let Err(settle_err) = self.settle_failure(event, &e).await {
                    error!(
                        stream_id = %event.stream_id,
                        error = %settle_err,
                        "Failed to re-queue or dead-letter job"
                    );
                }
            }
        }
    }

    async fn settle_failure(
        &self,
        event: &StreamEvent<J>,
        failure: &StreamError,
    ) -> Result<(), StreamError> {
        let job = &event.job;
        let stream = self.stream_name();

        if failure.should_retry(job.retry_count(), job.max_retries()) {
            let retry = job.with_retry();
            let new_id = self.producer.send(&retry).await?;
            metrics::job_retried(stream);
            info!(
                job_id = %job.job_id(),
                retry_count = retry.retry_count(),
                stream_id = %new_id,
                "Re-queued job"
            );
        } else {
            self.dlq
                .move_to_dlq(job, &failure.to_string(), &event.stream_id)
                .await?;
            metrics::job_dead_lettered(stream);
        }

        self.consumer.ack(&event.stream_id).await
    }
}
