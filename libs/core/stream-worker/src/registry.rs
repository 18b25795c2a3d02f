//! Stream definitions.

/// Stream definition trait.
///
/// Each domain implements this trait once so producers and workers agree on
/// the stream, group and dead-letter names.
///
/// ```rust,ignore
/// pub struct EmailStream;
///
/// impl StreamDef for EmailStream {
///     const STREAM_NAME: &'static str = "email:jobs";
///     const CONSUMER_GROUP: &'static str = "email_workers";
///     const DLQ_STREAM: &'static str = "email:dlq";
/// }
/// ```
pub trait StreamDef: Send + Sync {
    /// The Redis stream name (e.g., "email:jobs").
    const STREAM_NAME: &'static str;

    /// The consumer group name for this stream.
    const CONSUMER_GROUP: &'static str;

    /// The dead letter queue stream name for failed jobs.
    const DLQ_STREAM: &'static str;

    /// Approximate MAXLEN applied on XADD.
    const MAX_LENGTH: i64 = 100_000;

    /// Idle time after which a pending entry of another consumer is claimed.
    const CLAIM_MIN_IDLE_MS: u64 = 30_000;
}
