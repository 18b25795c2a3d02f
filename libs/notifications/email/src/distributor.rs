//! Enqueuing tasks from request handlers

use async_trait::async_trait;
use core_config::redis::RedisConfig;
use stream_worker::{StreamError, StreamProducer};
use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::MailError;
use crate::job::{EmailJob, SendConfirmationEmail};
use crate::streams::EmailStream;

/// Hands background tasks to the task processor.
#[async_trait]
pub trait TaskDistributor: Send + Sync + 'static {
    /// Returns the stream entry ID of the enqueued job.
    async fn distribute_send_confirmation_email(
        &self,
        task: SendConfirmationEmail,
    ) -> Result<String, MailError>;
}

/// [`TaskDistributor`] writing to the email stream.
///
/// Connects on first use, so building it never touches the network and a
/// Redis outage only fails the individual enqueue.
pub struct RedisTaskDistributor {
    redis_url: String,
    producer: OnceCell<StreamProducer>,
}

impl RedisTaskDistributor {
    pub fn new(redis: &RedisConfig) -> Self {
        Self {
            redis_url: redis.url.clone(),
            producer: OnceCell::new(),
        }
    }

    async fn producer(&self) -> Result<&StreamProducer, MailError> {
        self.producer
            .get_or_try_init(|| async {
                let redis = database::redis::connect(&self.redis_url)
                    .await
                    .map_err(StreamError::from)?;
                Ok(StreamProducer::from_stream_def::<EmailStream>(redis))
            })
            .await
    }
}

#[async_trait]
impl TaskDistributor for RedisTaskDistributor {
    async fn distribute_send_confirmation_email(
        &self,
        task: SendConfirmationEmail,
    ) -> Result<String, MailError> {
        let job = EmailJob::send_confirmation(&task);
        let stream_id = self.producer().await?.send(&job).await?;

        debug!(
            job_id = %job.id,
            customer_id = %task.customer_id,
            stream_id = %stream_id,
            "Enqueued confirmation email"
        );
        Ok(stream_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_redis_fails_the_enqueue() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let distributor =
            RedisTaskDistributor::new(&RedisConfig::new(format!("redis://127.0.0.1:{port}")));

        let err = distributor
            .distribute_send_confirmation_email(SendConfirmationEmail {
                customer_id: "id".into(),
                customer_name: "Name".into(),
                mail: "name@example.com".into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, MailError::Queue(_)));
    }
}
