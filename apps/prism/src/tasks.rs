use std::sync::Arc;

use core_config::redis::RedisConfig;
use email::{EmailJob, EmailProcessor, EmailStream, LogMailer, Mailer, SenderConfig, SmtpConfig, SmtpMailer};
use eyre::WrapErr;
use stream_worker::{StreamWorkerUnit, WorkerConfig};
use tracing::warn;

pub type TaskUnit = StreamWorkerUnit<EmailJob, EmailProcessor>;

/// The e-mail task processor. Mails are only logged when SMTP is not configured.
pub fn task_unit(
    redis: &RedisConfig,
    smtp: Option<&SmtpConfig>,
    sender: SenderConfig,
) -> eyre::Result<TaskUnit> {
    let mailer: Arc<dyn Mailer> = match smtp {
        Some(smtp) => Arc::new(SmtpMailer::new(smtp).wrap_err("building SMTP mailer")?),
        None => {
            warn!("SMTP_HOST not set, confirmation e-mails are logged instead of sent");
            Arc::new(LogMailer::new())
        }
    };

    Ok(StreamWorkerUnit::new(
        redis,
        EmailProcessor::from_arc(mailer, sender),
        WorkerConfig::from_stream_def::<EmailStream>(),
    ))
}
