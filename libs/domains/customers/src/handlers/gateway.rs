use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum_helpers::gateway::{Call, GatewayError, forward_response, json_body, query_params};
use rpc::customer::{
    CreateCustomerRequest, GetCustomerByBookIdRequest, GetCustomerRequest, SearchCustomerRequest,
};
use serde::Deserialize;
use tonic::Request;
use utoipa::IntoParams;

use super::GatewayState;

/// Paging parameters of the book listing
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page size, 50 when zero or absent
    pub limit: i32,
    /// Zero-based page index
    pub page: i32,
}

fn path_param(path: Result<Path<String>, PathRejection>) -> Result<String, GatewayError> {
    path.map(|Path(value)| value)
        .map_err(|rejection| GatewayError::invalid_argument(rejection.body_text()))
}

/// Create a customer
#[utoipa::path(
    post,
    path = "/v1/customers",
    tag = "customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 200, description = "Customer created", body = rpc::customer::CreateCustomerResponse),
        (status = 400, description = "Invalid request", body = axum_helpers::gateway::GatewayErrorBody),
        (status = 409, description = "Customer already exists", body = axum_helpers::gateway::GatewayErrorBody)
    )
)]
pub async fn create_customer(
    State(service): State<GatewayState>,
    call: Call,
    body: Result<Json<CreateCustomerRequest>, JsonRejection>,
) -> Response {
    let request = match json_body(body) {
        Ok(request) => request,
        Err(e) => return e.respond(call.into_carrier()),
    };

    let result = service.create_customer(Request::new(request)).await;
    forward_response(call.into_carrier(), result)
}

/// Search customers by substring
#[utoipa::path(
    post,
    path = "/v1/customers:search",
    tag = "customers",
    request_body = SearchCustomerRequest,
    responses(
        (status = 200, description = "Matching customers", body = rpc::customer::SearchCustomerResponse),
        (status = 400, description = "Invalid request", body = axum_helpers::gateway::GatewayErrorBody)
    )
)]
pub async fn search_customer(
    State(service): State<GatewayState>,
    call: Call,
    body: Result<Json<SearchCustomerRequest>, JsonRejection>,
) -> Response {
    let request = match json_body(body) {
        Ok(request) => request,
        Err(e) => return e.respond(call.into_carrier()),
    };

    let result = service.search_customer(Request::new(request)).await;
    forward_response(call.into_carrier(), result)
}

/// Get a customer with its contact
#[utoipa::path(
    get,
    path = "/v1/customers/{id}",
    tag = "customers",
    params(("id" = String, Path, description = "Customer UUID")),
    responses(
        (status = 200, description = "Customer found", body = rpc::customer::GetCustomerResponse),
        (status = 400, description = "Malformed id", body = axum_helpers::gateway::GatewayErrorBody),
        (status = 404, description = "Customer not found", body = axum_helpers::gateway::GatewayErrorBody)
    )
)]
pub async fn get_customer(
    State(service): State<GatewayState>,
    call: Call,
    id: Result<Path<String>, PathRejection>,
) -> Response {
    let id = match path_param(id) {
        Ok(id) => id,
        Err(e) => return e.respond(call.into_carrier()),
    };

    let result = service
        .get_customer(Request::new(GetCustomerRequest { id }))
        .await;
    forward_response(call.into_carrier(), result)
}

/// List the customers of a book
#[utoipa::path(
    get,
    path = "/v1/books/{book_id}/customers",
    tag = "customers",
    params(("book_id" = String, Path, description = "Book UUID"), PageParams),
    responses(
        (status = 200, description = "Customers of the book", body = rpc::customer::GetCustomerByBookIdResponse),
        (status = 400, description = "Invalid book id or paging", body = axum_helpers::gateway::GatewayErrorBody)
    )
)]
pub async fn get_customer_by_book_id(
    State(service): State<GatewayState>,
    call: Call,
    book_id: Result<Path<String>, PathRejection>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Response {
    let request = path_param(book_id).and_then(|book_id| {
        let params = query_params(params)?;
        Ok(GetCustomerByBookIdRequest {
            book_id,
            limit: params.limit,
            page: params.page,
        })
    });
    let request = match request {
        Ok(request) => request,
        Err(e) => return e.respond(call.into_carrier()),
    };

    let result = service.get_customer_by_book_id(Request::new(request)).await;
    forward_response(call.into_carrier(), result)
}
