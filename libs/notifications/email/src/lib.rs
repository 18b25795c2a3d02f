//! Outbound e-mail as background jobs on Redis Streams
//!
//! ## Components
//!
//! - **Jobs**: `EmailJob` on the `EmailStream`, built from task payloads such
//!   as `SendConfirmationEmail`
//! - **Distribution**: `TaskDistributor` / `RedisTaskDistributor` enqueue jobs
//!   from request handlers
//! - **Processing**: `EmailProcessor` renders a job and hands it to a `Mailer`
//! - **Mailers**: `SmtpMailer` (lettre) and `LogMailer` for development
//!
//! ## Usage
//!
//! ```ignore
//! use email::{EmailProcessor, EmailStream, LogMailer, SenderConfig};
//! use stream_worker::{StreamWorkerUnit, WorkerConfig};
//!
//! let processor = EmailProcessor::new(LogMailer::new(), SenderConfig::from_env()?);
//! let unit = StreamWorkerUnit::new(&redis, processor, WorkerConfig::from_stream_def::<EmailStream>());
//! ```

pub mod config;
pub mod distributor;
pub mod error;
pub mod job;
pub mod mailer;
pub mod processor;
pub mod streams;

pub use config::{SenderConfig, SmtpConfig};
pub use distributor::{RedisTaskDistributor, TaskDistributor};
pub use error::MailError;
pub use job::{EmailJob, EmailType, SendConfirmationEmail};
pub use mailer::{Email, LogMailer, Mailer, SmtpMailer};
pub use processor::EmailProcessor;
pub use streams::EmailStream;
