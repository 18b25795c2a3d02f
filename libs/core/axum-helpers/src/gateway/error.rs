use axum::Json;
use axum::extract::Query;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use grpc_helpers::status::http_status_from_code;
use serde::Serialize;
use tonic::Code;
use utoipa::ToSchema;

use super::{CallCarrier, post_call};
use crate::gateway::Call;

/// Error body returned by every gateway route.
///
/// ```json
/// { "code": 5, "message": "customer not found", "details": [] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GatewayErrorBody {
    /// Numeric gRPC status code
    pub code: i32,
    pub message: String,
    /// Always present, currently always empty
    pub details: Vec<serde_json::Value>,
}

/// A `tonic::Status` rendered as an HTTP response.
#[derive(Debug, Clone)]
pub struct GatewayError {
    status: StatusCode,
    body: GatewayErrorBody,
}

impl GatewayError {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        let status = StatusCode::from_u16(http_status_from_code(code))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        Self {
            status,
            body: GatewayErrorBody {
                code: code as i32,
                message: message.into(),
                details: Vec::new(),
            },
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(Code::InvalidArgument, message)
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &GatewayErrorBody {
        &self.body
    }

    /// Emit the request record for `carrier` and build the response.
    pub fn respond(self, carrier: Option<CallCarrier>) -> Response {
        let body = serde_json::to_string(&self.body).unwrap_or_default();
        post_call(carrier, self.status, Some(&body));
        self.into_response()
    }
}

impl From<tonic::Status> for GatewayError {
    fn from(status: tonic::Status) -> Self {
        Self::new(status.code(), status.message())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Decoded request body, or `InvalidArgument` for malformed JSON.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, GatewayError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| GatewayError::invalid_argument(rejection.body_text()))
}

/// Decoded query string, or `InvalidArgument` when a parameter does not parse.
pub fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, GatewayError> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| GatewayError::invalid_argument(rejection.body_text()))
}

/// Fallback for paths no gateway rule matches.
pub async fn not_found(call: Call) -> Response {
    GatewayError::new(Code::NotFound, "Not Found").respond(call.into_carrier())
}
