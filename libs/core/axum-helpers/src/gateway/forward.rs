use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::Response;
use serde::Serialize;
use tonic::Code;

use super::{CallCarrier, GatewayError};

pub const GATEWAY_MESSAGE: &str = "HTTP request processed (grpc-gateway)";

/// Post-call hook for a completed gateway call.
///
/// Turns the service result into the HTTP response and emits the request
/// record for `carrier`: 200 on success, the mapped status on error.
pub fn forward_response<T>(
    carrier: Option<CallCarrier>,
    result: Result<tonic::Response<T>, tonic::Status>,
) -> Response
where
    T: Serialize,
{
    let message = match result {
        Ok(response) => response.into_inner(),
        Err(status) => return GatewayError::from(status).respond(carrier),
    };

    match serde_json::to_vec(&message) {
        Ok(bytes) => {
            post_call(carrier, StatusCode::OK, None);
            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(bytes))
                .unwrap_or_default()
        }
        Err(e) => GatewayError::new(Code::Internal, e.to_string()).respond(carrier),
    }
}

/// Emit the record for a finished call. Returns `false` and logs nothing when
/// the call carries no [`CallCarrier`].
pub fn post_call(carrier: Option<CallCarrier>, status: StatusCode, body: Option<&str>) -> bool {
    let Some(carrier) = carrier else {
        return false;
    };

    let mut record = carrier
        .into_pending()
        .complete(status.as_u16(), status.canonical_reason().unwrap_or("Unknown"))
        .with_message(GATEWAY_MESSAGE);
    if let Some(body) = body {
        record = record.with_body(body);
    }
    record.emit();
    true
}
