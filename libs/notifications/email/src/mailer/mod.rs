//! Mail transports

mod log;
mod smtp;

pub use log::LogMailer;
pub use smtp::SmtpMailer;

use crate::error::MailError;
use async_trait::async_trait;

/// A fully rendered message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    /// `Name <address>`
    pub from: String,
    pub to: String,
    pub to_name: Option<String>,
    pub subject: String,
    pub body_text: String,
}

#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Deliver `email`; returns the transport's message ID.
    async fn send(&self, email: &Email) -> Result<String, MailError>;

    fn name(&self) -> &'static str;
}
