//! Stream Worker Framework
//!
//! Background job processing on Redis Streams consumer groups.
//!
//! ## Features
//!
//! - **Generic worker**: `StreamWorker<J, P>` processes any job type
//! - **Consumer groups**: `XREADGROUP ... BLOCK` so several processes can share a stream
//! - **Retries**: failed jobs are re-queued with an incremented retry count
//! - **Dead Letter Queue**: jobs past their retry limit go to a DLQ stream
//! - **Recovery**: entries left pending by stopped or crashed consumers are
//!   claimed with `XAUTOCLAIM` once idle for `claim_min_idle`
//! - **Supervised**: [`StreamWorkerUnit`] runs the worker as a `lifecycle::Unit`
//!
//! ## Example
//!
//! ```ignore
//! use stream_worker::{StreamDef, StreamWorkerUnit, WorkerConfig};
//!
//! struct EmailStream;
//! impl StreamDef for EmailStream {
//!     const STREAM_NAME: &'static str = "email:jobs";
//!     const CONSUMER_GROUP: &'static str = "email_workers";
//!     const DLQ_STREAM: &'static str = "email:dlq";
//! }
//!
//! let config = WorkerConfig::from_stream_def::<EmailStream>();
//! let unit = StreamWorkerUnit::new(redis_config, processor, config);
//! supervisor.with_unit(unit);
//! ```

mod config;
mod consumer;
mod dlq;
mod error;
mod event;
pub mod metrics;
mod producer;
mod registry;
mod unit;
mod worker;

pub use config::WorkerConfig;
pub use consumer::{CLAIM_START, StreamConsumer};
pub use dlq::{DlqEntry, DlqManager};
pub use error::{ErrorCategory, StreamError};
pub use event::StreamEvent;
pub use producer::StreamProducer;
pub use registry::StreamDef;
pub use unit::StreamWorkerUnit;
pub use worker::{StreamJob, StreamProcessor, StreamWorker};
