use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::{Method, Uri};
use axum::middleware::Next;
use axum::response::Response;
use observability::{PendingRequest, Protocol};

/// Per-request state handed from [`pre_call`] to the post-call hook.
///
/// Lives in the request extensions and nowhere else.
#[derive(Debug, Clone)]
pub struct CallCarrier {
    request: PendingRequest,
}

impl CallCarrier {
    pub fn start(method: &Method, uri: &Uri) -> Self {
        let path = uri
            .path_and_query()
            .map(|path| path.as_str())
            .unwrap_or_else(|| uri.path());

        Self {
            request: PendingRequest::start(Protocol::Http, method.as_str(), path),
        }
    }

    pub fn method(&self) -> &str {
        self.request.method()
    }

    /// Path including the query string, as received.
    pub fn path(&self) -> &str {
        self.request.path()
    }

    pub fn elapsed(&self) -> Duration {
        self.request.elapsed()
    }

    pub fn into_pending(self) -> PendingRequest {
        self.request
    }
}

/// Pre-call hook. Records method, path and start time; logs nothing.
pub async fn pre_call(mut request: Request, next: Next) -> Response {
    let carrier = CallCarrier::start(request.method(), request.uri());
    request.extensions_mut().insert(carrier);
    next.run(request).await
}

/// Extracts the [`CallCarrier`] stored by [`pre_call`], if any.
///
/// Never rejects. Routes mounted without the pre-call hook get `Call(None)`,
/// and the post-call hook then stays silent.
#[derive(Debug)]
pub struct Call(Option<CallCarrier>);

impl Call {
    pub fn carrier(&self) -> Option<&CallCarrier> {
        self.0.as_ref()
    }

    pub fn into_carrier(self) -> Option<CallCarrier> {
        self.0
    }
}

impl<S> FromRequestParts<S> for Call
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.remove::<CallCarrier>()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_carrier_keeps_query_string() {
        let uri: Uri = "/v1/books/b1/customers?limit=10&page=2".parse().unwrap();
        let carrier = CallCarrier::start(&Method::GET, &uri);
        assert_eq!(carrier.method(), "GET");
        assert_eq!(carrier.path(), "/v1/books/b1/customers?limit=10&page=2");
    }

    #[tokio::test]
    async fn test_call_takes_the_carrier_once() {
        let request = Request::builder()
            .uri("/v1/customers/1")
            .extension(CallCarrier::start(&Method::GET, &"/v1/customers/1".parse().unwrap()))
            .body(Body::empty())
            .unwrap();
        let (mut parts, _body) = request.into_parts();

        let first = Call::from_request_parts(&mut parts, &()).await.unwrap();
        let second = Call::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(first.carrier().map(CallCarrier::path), Some("/v1/customers/1"));
        assert!(second.carrier().is_none());
    }
}
