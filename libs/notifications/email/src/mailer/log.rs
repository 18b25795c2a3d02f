use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use super::{Email, Mailer};
use crate::error::MailError;

/// Logs mail instead of sending it. Keeps a copy of everything "sent".
#[derive(Clone, Default)]
pub struct LogMailer {
    sent: Arc<Mutex<Vec<Email>>>,
    fail_with: Option<String>,
}

impl LogMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send fails with a transport error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_with: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Email> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &Email) -> Result<String, MailError> {
        if let Some(message) = &self.fail_with {
            return Err(MailError::Transport(message.clone()));
        }

        let message_id = format!("log-{}", Uuid::new_v4());
        info!(
            message_id = %message_id,
            from = %email.from,
            to = %email.to,
            subject = %email.subject,
            "Email logged (not sent)"
        );

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(email.clone());
        }
        Ok(message_id)
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
