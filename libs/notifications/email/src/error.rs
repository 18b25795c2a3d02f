//! Error types for sending and enqueuing e-mail.

use core_config::ConfigError;
use stream_worker::StreamError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid address '{address}': {details}")]
    InvalidAddress { address: String, details: String },

    #[error("Failed to build message: {0}")]
    Build(String),

    /// The relay could not be reached or refused the message
    #[error("SMTP transport error: {0}")]
    Transport(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to enqueue email job: {0}")]
    Queue(#[from] StreamError),
}

impl MailError {
    pub fn invalid_address(address: impl Into<String>, details: impl ToString) -> Self {
        Self::InvalidAddress {
            address: address.into(),
            details: details.to_string(),
        }
    }

    /// Retrying cannot fix a malformed address or message.
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::InvalidAddress { .. } | Self::Build(_))
    }
}

impl From<MailError> for StreamError {
    fn from(err: MailError) -> Self {
        if err.is_permanent() {
            StreamError::permanent(err.to_string())
        } else {
            StreamError::transient(err.to_string())
        }
    }
}
