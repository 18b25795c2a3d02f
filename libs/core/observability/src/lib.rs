//! Observability shared by every inbound surface.
//!
//! - [`RequestLog`]: the one structured record emitted per inbound call,
//!   whether it arrived over gRPC or through the HTTP gateway
//! - [`RequestMetrics`]: Prometheus counters and histograms for the same calls
//! - [`init_metrics`] / [`metrics_handler`]: recorder setup and `/metrics`
//!
//! ```rust,ignore
//! use observability::{PendingRequest, Protocol};
//!
//! let pending = PendingRequest::start(Protocol::Http, "GET", "/v1/customers/42");
//! // ... handle the call ...
//! pending.complete(404, "Not Found").with_body(error_json).emit();
//! ```

mod record;
mod request_metrics;

pub use record::{FieldValue, LogFields, PendingRequest, Protocol, RequestLog, Severity};
pub use request_metrics::RequestMetrics;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder. Call once at startup; later calls return
/// the handle installed by the first.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;
        info!("Prometheus metrics recorder initialized");
        RequestMetrics::describe();
        Ok(handle)
    })
}

pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for the `/metrics` endpoint
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}
