//! EmailJob - the payload the email worker consumes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stream_worker::StreamJob;
use uuid::Uuid;

/// Which template the processor renders
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmailType {
    /// Sent after a customer with a mail address was registered
    SendConfirmationEmail,
    /// Subject and body supplied by the caller
    #[default]
    Transactional,
}

/// Task payload for a confirmation mail to a newly created customer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendConfirmationEmail {
    pub customer_id: String,
    pub customer_name: String,
    pub mail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailJob {
    pub id: Uuid,

    pub email_type: EmailType,

    pub to_email: String,

    pub to_name: Option<String>,

    /// Used as-is for transactional mail; templates build their own
    pub subject: String,

    #[serde(default)]
    pub template_vars: serde_json::Value,

    pub body_text: Option<String>,

    #[serde(default)]
    pub retry_count: u32,

    pub created_at: DateTime<Utc>,
}

impl EmailJob {
    pub fn new(
        email_type: EmailType,
        to_email: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email_type,
            to_email: to_email.into(),
            to_name: None,
            subject: subject.into(),
            template_vars: serde_json::Value::Null,
            body_text: None,
            retry_count: 0,
            created_at: Utc::now(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.to_name = Some(name.into());
        self
    }

    pub fn with_vars(mut self, vars: serde_json::Value) -> Self {
        self.template_vars = vars;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.body_text = Some(text.into());
        self
    }

    pub fn send_confirmation(task: &SendConfirmationEmail) -> Self {
        Self::new(
            EmailType::SendConfirmationEmail,
            &task.mail,
            "Registration confirmed",
        )
        .with_name(&task.customer_name)
        .with_vars(serde_json::json!({
            "customer_id": task.customer_id,
            "name": task.customer_name,
        }))
    }
}

impl StreamJob for EmailJob {
    fn job_id(&self) -> String {
        self.id.to_string()
    }

    fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Keeps the job ID so every attempt logs under the same ID.
    fn with_retry(&self) -> Self {
        Self {
            retry_count: self.retry_count + 1,
            ..self.clone()
        }
    }
}
