use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use core_config::redis::RedisConfig;
use lifecycle::{Drain, Unit, UnitError};
use tracing::info;

use crate::config::WorkerConfig;
use crate::worker::{StreamJob, StreamProcessor, StreamWorker};

/// A [`StreamWorker`] run as a supervised unit.
///
/// Redis is connected inside `serve`: an unreachable server or a failing
/// consumer-group creation ends the unit with [`UnitError::Connect`]. Stop
/// waits for the job in progress; there is no grace period after which a
/// job is abandoned.
pub struct StreamWorkerUnit<J, P>
where
    J: StreamJob,
    P: StreamProcessor<J>,
{
    name: String,
    redis_url: String,
    processor: Arc<P>,
    config: WorkerConfig,
    drain: Drain,
    _job: std::marker::PhantomData<fn() -> J>,
}

impl<J, P> StreamWorkerUnit<J, P>
where
    J: StreamJob,
    P: StreamProcessor<J>,
{
    pub fn new(redis: &RedisConfig, processor: P, config: WorkerConfig) -> Self {
        Self {
            name: "tasks".to_string(),
            redis_url: redis.url.clone(),
            processor: Arc::new(processor),
            config,
            drain: Drain::new(Duration::ZERO),
            _job: std::marker::PhantomData,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    async fn run(&self) -> Result<(), UnitError> {
        let redis = tokio::select! {
            connected = database::redis::connect_with_config(
                &self.redis_url,
                self.config.connection_config(),
            ) => {
                connected.map_err(|e| UnitError::connect("redis", e))?
            }
            _ = self.drain.stop_requested() => return Err(UnitError::Closed),
        };

        let worker = StreamWorker::new(redis, Arc::clone(&self.processor), self.config.clone());
        worker
            .consumer()
            .ensure_consumer_group()
            .await
            .map_err(|e| UnitError::connect("redis", e))?;

        info!(
            unit = %self.name,
            stream = %self.config.stream_name,
            "Task processor started"
        );

        worker.run(&self.drain.stop_signal()).await;
        Err(UnitError::Closed)
    }
}

#[async_trait]
impl<J, P> Unit for StreamWorkerUnit<J, P>
where
    J: StreamJob,
    P: StreamProcessor<J>,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn serve(&self) -> Result<(), UnitError> {
        self.drain.begin()?;
        let result = self.run().await;
        self.drain.finish();
        result
    }

    async fn stop(&self) {
        self.drain.request_stop().await;
    }
}
