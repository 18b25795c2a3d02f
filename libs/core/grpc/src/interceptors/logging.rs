use std::task::{Context, Poll};

use futures::future::BoxFuture;
use observability::{LogFields, PendingRequest, Protocol, Severity};
use tonic::Code;
use tonic::transport::server::TcpConnectInfo;
use tower::{Layer, Service};

use crate::status::{code_name, http_status_from_code};

/// Maps the final status code of a call to the severity of its log record.
pub type CodeToLevel = fn(Code) -> Severity;

/// Error severity for every code whose HTTP equivalent is 400 or above,
/// info otherwise.
pub fn default_level(code: Code) -> Severity {
    Severity::for_http_status(http_status_from_code(code))
}

/// Client mistakes at warn, server faults at error.
pub fn conventional_level(code: Code) -> Severity {
    match code {
        Code::Ok
        | Code::Cancelled
        | Code::InvalidArgument
        | Code::NotFound
        | Code::AlreadyExists
        | Code::Unauthenticated => Severity::Info,
        Code::DeadlineExceeded
        | Code::PermissionDenied
        | Code::ResourceExhausted
        | Code::FailedPrecondition
        | Code::Aborted
        | Code::OutOfRange
        | Code::Unavailable => Severity::Warn,
        Code::Unknown | Code::Unimplemented | Code::Internal | Code::DataLoss => Severity::Error,
    }
}

/// Emits exactly one request record per call, when the response is ready.
///
/// Nothing is logged on entry. The status is read from the `grpc-status`
/// response header, which tonic sets for every failed unary call; a response
/// without it is a success.
#[derive(Clone, Copy, Debug)]
pub struct GrpcLoggingLayer {
    code_to_level: CodeToLevel,
}

impl GrpcLoggingLayer {
    pub fn new() -> Self {
        Self {
            code_to_level: default_level,
        }
    }

    pub fn with_code_to_level(code_to_level: CodeToLevel) -> Self {
        Self { code_to_level }
    }
}

impl Default for GrpcLoggingLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for GrpcLoggingLayer {
    type Service = GrpcLogging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GrpcLogging {
            inner,
            code_to_level: self.code_to_level,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GrpcLogging<S> {
    inner: S,
    code_to_level: CodeToLevel,
}

impl<S, ReqBody, ResBody> Service<http::Request<ReqBody>> for GrpcLogging<S>
where
    S: Service<http::Request<ReqBody>, Response = http::Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: http::Request<ReqBody>) -> Self::Future {
        let path = request.uri().path().to_string();
        let (service, method) = split_path(&path);

        let mut fields = LogFields::new()
            .with("grpc.service", service.to_string())
            .with("grpc.method", method.to_string());
        let peer = request
            .extensions()
            .get::<TcpConnectInfo>()
            .and_then(TcpConnectInfo::remote_addr);

        let pending = PendingRequest::start(Protocol::Grpc, method.to_string(), path.clone());
        let code_to_level = self.code_to_level;

        // The clone that was driven to readiness is the one we call.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let result = inner.call(request).await;

            let (code, message) = match &result {
                Ok(response) => match tonic::Status::from_header_map(response.headers()) {
                    Some(status) => (status.code(), Some(status.message().to_string())),
                    None => (Code::Ok, None),
                },
                Err(_) => (Code::Unknown, None),
            };

            fields.push("grpc.code", code_name(code));
            if let Some(peer) = peer {
                fields.push("peer.address", peer.to_string());
            }

            let mut record = pending
                .complete(http_status_from_code(code), code_name(code))
                .with_severity(code_to_level(code))
                .with_fields(fields)
                .with_message("finished call");
            if let Some(message) = message.filter(|_| code != Code::Ok) {
                record = record.with_body(message);
            }
            record.emit();

            result
        })
    }
}

/// `/customer.v1.CustomerService/GetCustomer` into service and method.
fn split_path(path: &str) -> (&str, &str) {
    path.trim_start_matches('/')
        .split_once('/')
        .unwrap_or(("unknown", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use test_utils::LogCapture;
    use tower::ServiceExt;

    fn grpc_response(code: Option<Code>) -> http::Response<()> {
        let mut response = http::Response::new(());
        if let Some(code) = code {
            let status = tonic::Status::new(code, "customer not found");
            status
                .add_header(response.headers_mut())
                .expect("status headers");
        }
        response
    }

    fn request() -> http::Request<()> {
        http::Request::builder()
            .uri("/customer.v1.CustomerService/GetCustomer")
            .body(())
            .unwrap()
    }

    #[test]
    fn test_split_path() {
        assert_eq!(
            split_path("/customer.v1.CustomerService/GetCustomer"),
            ("customer.v1.CustomerService", "GetCustomer")
        );
        assert_eq!(split_path("garbage"), ("unknown", "garbage"));
    }

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(Code::Ok), Severity::Info);
        assert_eq!(default_level(Code::NotFound), Severity::Error);
        assert_eq!(default_level(Code::Internal), Severity::Error);
        assert_eq!(conventional_level(Code::NotFound), Severity::Info);
        assert_eq!(conventional_level(Code::Unavailable), Severity::Warn);
    }

    #[tokio::test]
    async fn test_not_found_logs_one_error_record() {
        let capture = LogCapture::new();
        let _guard = capture.install();

        let service = GrpcLoggingLayer::new().layer(tower::service_fn(|_req: http::Request<()>| async {
            Ok::<_, Infallible>(grpc_response(Some(Code::NotFound)))
        }));
        service.oneshot(request()).await.unwrap();

        let records = capture.request_records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record["level"], "ERROR");
        assert_eq!(record["protocol"], "grpc");
        assert_eq!(record["method"], "GetCustomer");
        assert_eq!(record["status_code"], 404);
        assert_eq!(record["status_text"], "NOT_FOUND");
        assert_eq!(record["body"], "customer not found");
        let fields = record["fields"].as_str().unwrap();
        assert!(fields.contains("grpc.service=customer.v1.CustomerService"));
        assert!(fields.contains("grpc.code=NOT_FOUND"));
    }

    #[tokio::test]
    async fn test_ok_logs_one_info_record_without_body() {
        let capture = LogCapture::new();
        let _guard = capture.install();

        let service = GrpcLoggingLayer::new().layer(tower::service_fn(|_req: http::Request<()>| async {
            Ok::<_, Infallible>(grpc_response(None))
        }));
        service.oneshot(request()).await.unwrap();

        let records = capture.request_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["level"], "INFO");
        assert_eq!(records[0]["status_code"], 200);
        assert_eq!(records[0]["status_text"], "OK");
        assert!(records[0].get("body").is_none());
    }

    #[tokio::test]
    async fn test_custom_code_to_level() {
        let capture = LogCapture::new();
        let _guard = capture.install();

        let service = GrpcLoggingLayer::with_code_to_level(conventional_level).layer(
            tower::service_fn(|_req: http::Request<()>| async {
                Ok::<_, Infallible>(grpc_response(Some(Code::NotFound)))
            }),
        );
        service.oneshot(request()).await.unwrap();

        assert_eq!(capture.request_records()[0]["level"], "INFO");
    }
}
