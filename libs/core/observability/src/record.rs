use std::fmt;
use std::time::{Duration, Instant};

use chrono::{DateTime, SecondsFormat, Utc};
use strum::{AsRefStr, Display};
use tracing::Level;
use tracing::field::display;

use crate::RequestMetrics;

const DEFAULT_MESSAGE: &str = "request processed";

/// Which inbound surface received the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Protocol {
    Grpc,
    Http,
}

/// Log severity of a request record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

impl Severity {
    /// Status 400 and above is an error, everything else info.
    pub fn for_http_status(status: u16) -> Self {
        if status >= 400 { Self::Error } else { Self::Info }
    }

    /// Parse a level name; unknown names fall back to info.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Self::Debug,
            "warn" | "warning" => Self::Warn,
            "error" | "fatal" | "panic" => Self::Error,
            _ => Self::Info,
        }
    }

    pub fn as_level(self) -> Level {
        match self {
            Self::Debug => Level::DEBUG,
            Self::Info => Level::INFO,
            Self::Warn => Level::WARN,
            Self::Error => Level::ERROR,
        }
    }
}

/// A typed value in [`LogFields`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Uint(u64),
    Bool(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(value) => f.write_str(value),
            Self::Int(value) => write!(f, "{value}"),
            Self::Uint(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        Self::Uint(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Ordered list of extra key/value pairs attached to a record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogFields(Vec<(&'static str, FieldValue)>);

impl LogFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, value: impl Into<FieldValue>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: &'static str, value: impl Into<FieldValue>) {
        self.0.push((key, value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }
}

impl fmt::Display for LogFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

/// A call that has been received but not completed yet.
///
/// Created at call entry. Nothing is logged until [`complete`](Self::complete)
/// turns it into a [`RequestLog`].
#[derive(Debug, Clone)]
pub struct PendingRequest {
    protocol: Protocol,
    method: String,
    path: String,
    started_at: Instant,
    started: DateTime<Utc>,
}

impl PendingRequest {
    pub fn start(protocol: Protocol, method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            protocol,
            method: method.into(),
            path: path.into(),
            started_at: Instant::now(),
            started: Utc::now(),
        }
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn started(&self) -> DateTime<Utc> {
        self.started
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Finalize the call with its status. Severity defaults to
    /// [`Severity::for_http_status`] of `status_code` for HTTP and info for
    /// gRPC; override it with [`RequestLog::with_severity`].
    pub fn complete(self, status_code: u16, status_text: impl Into<String>) -> RequestLog {
        let severity = match self.protocol {
            Protocol::Http => Severity::for_http_status(status_code),
            Protocol::Grpc => Severity::Info,
        };

        RequestLog {
            duration: self.started_at.elapsed(),
            protocol: self.protocol,
            method: self.method,
            path: self.path,
            started: self.started,
            status_code,
            status_text: status_text.into(),
            severity,
            body: None,
            fields: LogFields::new(),
            message: DEFAULT_MESSAGE,
        }
    }
}

/// One structured record per inbound call.
///
/// Same shape for every surface. [`emit`](Self::emit) consumes the record, so
/// it is written exactly once and cannot change afterwards.
#[derive(Debug, Clone)]
pub struct RequestLog {
    protocol: Protocol,
    method: String,
    path: String,
    started: DateTime<Utc>,
    duration: Duration,
    status_code: u16,
    status_text: String,
    severity: Severity,
    body: Option<String>,
    fields: LogFields,
    message: &'static str,
}

impl RequestLog {
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Attach the error body. Ignored for successful calls.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        if self.severity == Severity::Error || self.status_code >= 400 {
            self.body = Some(body.into());
        }
        self
    }

    pub fn with_fields(mut self, fields: LogFields) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = message;
        self
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn fields(&self) -> &LogFields {
        &self.fields
    }

    /// Write the record through `tracing` and count it in the request metrics.
    pub fn emit(self) {
        macro_rules! emit_at {
            ($level:expr) => {
                tracing::event!(
                    target: "request",
                    $level,
                    protocol = %self.protocol,
                    method = %self.method,
                    path = %self.path,
                    started = %self.started.to_rfc3339_opts(SecondsFormat::Millis, true),
                    duration_ms = self.duration.as_secs_f64() * 1000.0,
                    status_code = self.status_code,
                    status_text = %self.status_text,
                    body = self.body.as_deref(),
                    fields = (!self.fields.is_empty()).then(|| display(&self.fields)),
                    "{}",
                    self.message
                )
            };
        }

        match self.severity {
            Severity::Debug => emit_at!(Level::DEBUG),
            Severity::Info => emit_at!(Level::INFO),
            Severity::Warn => emit_at!(Level::WARN),
            Severity::Error => emit_at!(Level::ERROR),
        }

        RequestMetrics::record(self.protocol, &self.method, self.status_code, self.duration);
    }
}
