//! In-process gateway from JSON over HTTP to tonic services.
//!
//! A gateway route is a plain axum handler that decodes the HTTP request into
//! the proto request message, calls the service implementation directly and
//! hands the result to [`forward_response`].
//!
//! Logging is split in two hooks. [`pre_call`] runs before routing and stores a
//! [`CallCarrier`] in the request extensions. The handler takes it out through
//! the [`Call`] extractor and passes it to [`forward_response`] (or
//! [`GatewayError::respond`]), which emits the request record. A carrier can
//! only be taken once, so a call produces at most one record.
//!
//! ```ignore
//! async fn get_customer(
//!     State(service): State<Arc<CustomerServer<R>>>,
//!     call: Call,
//!     Path(id): Path<String>,
//! ) -> Response {
//!     let result = service.get_customer(tonic::Request::new(GetCustomerRequest { id })).await;
//!     forward_response(call.into_carrier(), result)
//! }
//! ```

mod carrier;
mod error;
mod forward;

pub use carrier::{Call, CallCarrier, pre_call};
pub use error::{GatewayError, GatewayErrorBody, json_body, not_found, query_params};
pub use forward::{GATEWAY_MESSAGE, forward_response, post_call};
