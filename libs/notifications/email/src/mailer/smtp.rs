//! SMTP mailer using lettre

use super::{Email, Mailer};
use crate::config::SmtpConfig;
use crate::error::MailError;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| MailError::Transport(e.to_string()))?
        } else {
            // Plain connection, e.g. Mailpit in development
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };

        let builder = if config.username.is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
        };

        Ok(Self {
            transport: builder.port(config.port).build(),
        })
    }

    pub(crate) fn build_message(email: &Email) -> Result<Message, MailError> {
        let from: Mailbox = email
            .from
            .parse()
            .map_err(|e| MailError::invalid_address(&email.from, e))?;

        let to_address = match &email.to_name {
            Some(name) => format!("{name} <{}>", email.to),
            None => email.to.clone(),
        };
        let to: Mailbox = to_address
            .parse()
            .map_err(|e| MailError::invalid_address(&email.to, e))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(&email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body_text.clone())
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &Email) -> Result<String, MailError> {
        let message = Self::build_message(email)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let message_id = response
            .message()
            .next()
            .map(|s| s.to_string())
            .unwrap_or_default();

        info!(to = %email.to, subject = %email.subject, "Email sent via SMTP");
        Ok(message_id)
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(to: &str) -> Email {
        Email {
            from: "Prism <noreply@example.com>".into(),
            to: to.into(),
            to_name: Some("Taro Suzuki".into()),
            subject: "Registration confirmed".into(),
            body_text: "Hello".into(),
        }
    }

    #[test]
    fn test_build_message() {
        let message = SmtpMailer::build_message(&email("taro@example.com")).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Subject: Registration confirmed"));
        assert!(raw.contains("taro@example.com"));
    }

    #[test]
    fn test_invalid_recipient_is_permanent() {
        let err = SmtpMailer::build_message(&email("not-an-address")).unwrap_err();
        assert!(err.is_permanent());
    }

    #[tokio::test]
    async fn test_plain_transport_builds_without_network() {
        let config = SmtpConfig {
            host: "localhost".into(),
            port: 1025,
            username: String::new(),
            password: String::new(),
            use_tls: false,
        };

        let mailer = SmtpMailer::new(&config).unwrap();
        assert_eq!(mailer.name(), "smtp");
    }
}
