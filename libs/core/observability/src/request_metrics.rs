//! Request metrics for both inbound surfaces.

use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};

use crate::Protocol;

/// Request metrics recorder
pub struct RequestMetrics;

impl RequestMetrics {
    /// Count one completed call and record its duration.
    ///
    /// `status_code` is the HTTP status, or the HTTP equivalent of the gRPC
    /// code, so both protocols fail at 400 and above.
    pub fn record(protocol: Protocol, method: &str, status_code: u16, duration: Duration) {
        let failed = status_code >= 400;

        counter!(
            "requests_total",
            "protocol" => protocol.as_ref().to_owned(),
            "method" => method.to_owned(),
            "status" => status_code.to_string()
        )
        .increment(1);

        histogram!(
            "request_duration_seconds",
            "protocol" => protocol.as_ref().to_owned(),
            "method" => method.to_owned()
        )
        .record(duration.as_secs_f64());

        if failed {
            counter!(
                "requests_errors_total",
                "protocol" => protocol.as_ref().to_owned(),
                "method" => method.to_owned()
            )
            .increment(1);
        }
    }

    pub(crate) fn describe() {
        describe_counter!(
            "requests_total",
            "Total inbound calls by protocol, method and status"
        );
        describe_histogram!(
            "request_duration_seconds",
            "Inbound call duration in seconds"
        );
        describe_counter!(
            "requests_errors_total",
            "Inbound calls that ended with an error status"
        );
    }
}
