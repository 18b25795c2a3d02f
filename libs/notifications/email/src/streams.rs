//! Stream definitions for email processing

use stream_worker::StreamDef;

/// Redis stream carrying `EmailJob`s
pub struct EmailStream;

impl StreamDef for EmailStream {
    const STREAM_NAME: &'static str = "email:jobs";
    const CONSUMER_GROUP: &'static str = "email_workers";
    const DLQ_STREAM: &'static str = "email:dlq";
    const MAX_LENGTH: i64 = 50_000;
}
