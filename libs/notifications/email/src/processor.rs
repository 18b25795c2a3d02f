//! EmailProcessor - renders `EmailJob`s and hands them to a `Mailer`

use crate::config::SenderConfig;
use crate::job::{EmailJob, EmailType};
use crate::mailer::{Email, Mailer};
use async_trait::async_trait;
use std::sync::Arc;
use stream_worker::{StreamError, StreamProcessor};
use tracing::{debug, info};

pub struct EmailProcessor {
    mailer: Arc<dyn Mailer>,
    sender: SenderConfig,
}

impl EmailProcessor {
    pub fn new(mailer: impl Mailer, sender: SenderConfig) -> Self {
        Self::from_arc(Arc::new(mailer), sender)
    }

    pub fn from_arc(mailer: Arc<dyn Mailer>, sender: SenderConfig) -> Self {
        Self { mailer, sender }
    }

    fn render(&self, job: &EmailJob) -> Result<Email, StreamError> {
        let (subject, body_text) = match job.email_type {
            EmailType::SendConfirmationEmail => {
                let name = job.template_vars["name"]
                    .as_str()
                    .or(job.to_name.as_deref())
                    .unwrap_or("customer");
                let customer_id = job.template_vars["customer_id"]
                    .as_str()
                    .ok_or_else(|| StreamError::permanent("confirmation job without customer_id"))?;

                (
                    format!("{} - registration confirmed", self.sender.from_name),
                    format!(
                        "Hello {name},\n\n\
                         your customer record has been registered.\n\
                         Reference: {customer_id}\n\n\
                         {}\n",
                        self.sender.from_name
                    ),
                )
            }
            EmailType::Transactional => {
                let body = job
                    .body_text
                    .clone()
                    .ok_or_else(|| StreamError::permanent("transactional email without a body"))?;
                (job.subject.clone(), body)
            }
        };

        Ok(Email {
            from: self.sender.mailbox(),
            to: job.to_email.clone(),
            to_name: job.to_name.clone(),
            subject,
            body_text,
        })
    }
}

#[async_trait]
impl StreamProcessor<EmailJob> for EmailProcessor {
    async fn process(&self, job: &EmailJob) -> Result<(), StreamError> {
        debug!(
            job_id = %job.id,
            email_type = ?job.email_type,
            retry_count = job.retry_count,
            "Processing email job"
        );

        let email = self.render(job)?;
        let message_id = self.mailer.send(&email).await?;

        info!(
            job_id = %job.id,
            message_id = %message_id,
            mailer = self.mailer.name(),
            "Email delivered"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "email_processor"
    }
}
