use std::net::SocketAddr;

use axum::body::{Body, to_bytes};
use axum::extract::{ConnectInfo, Request};
use axum::http::header::USER_AGENT;
use axum::middleware::Next;
use axum::response::Response;
use observability::{LogFields, PendingRequest, Protocol};

pub const ACCESS_LOG_MESSAGE: &str = "HTTP request processed";

/// Whole-request access logger for routes outside the gateway (docs, metrics).
///
/// Emits one record per request with `remote_addr` and `user_agent` fields.
/// Error responses are buffered so their body can be attached to the record.
pub async fn access_log(request: Request, next: Next) -> Response {
    let mut fields = LogFields::new();
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        fields.push("remote_addr", addr.to_string());
    }
    if let Some(agent) = request
        .headers()
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
    {
        fields.push("user_agent", agent.to_string());
    }

    let path = request
        .uri()
        .path_and_query()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let pending = PendingRequest::start(Protocol::Http, request.method().as_str(), path);

    let response = next.run(request).await;
    let status = response.status();
    let record = pending
        .complete(status.as_u16(), status.canonical_reason().unwrap_or("Unknown"))
        .with_fields(fields)
        .with_message(ACCESS_LOG_MESSAGE);

    if !status.is_client_error() && !status.is_server_error() {
        record.emit();
        return response;
    }

    let (parts, body) = response.into_parts();
    match to_bytes(body, usize::MAX).await {
        Ok(bytes) => {
            record.with_body(String::from_utf8_lossy(&bytes)).emit();
            Response::from_parts(parts, Body::from(bytes))
        }
        Err(e) => {
            record.with_body(e.to_string()).emit();
            Response::from_parts(parts, Body::empty())
        }
    }
}
