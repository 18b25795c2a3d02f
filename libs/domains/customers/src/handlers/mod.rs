//! HTTP gateway routes for `customer.v1.CustomerService`.

pub mod gateway;

use std::sync::Arc;

use axum::Router;
use axum::routing::{MethodFilter, MethodRouter, on};
use axum_helpers::gateway::GatewayErrorBody;
use rpc::customer::customer_service_server::CustomerService;
use rpc::customer::{
    Contact, CreateCustomerRequest, CreateCustomerResponse, Customer, GetCustomerByBookIdResponse,
    GetCustomerResponse, SearchCustomerRequest, SearchCustomerResponse,
};
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};
use utoipa::OpenApi;

/// Service handle shared by every gateway route
pub type GatewayState = Arc<dyn CustomerService>;

/// The gateway translation table: one entry per RPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, IntoStaticStr)]
pub enum CustomerRpc {
    CreateCustomer,
    SearchCustomer,
    GetCustomer,
    GetCustomerByBookId,
}

impl CustomerRpc {
    pub const ALL: [Self; 4] = [
        Self::CreateCustomer,
        Self::SearchCustomer,
        Self::GetCustomer,
        Self::GetCustomerByBookId,
    ];

    /// HTTP method and axum path of the rule bound to this RPC.
    pub fn http_rule(self) -> (MethodFilter, &'static str) {
        match self {
            Self::CreateCustomer => (MethodFilter::POST, "/v1/customers"),
            Self::SearchCustomer => (MethodFilter::POST, "/v1/customers:search"),
            Self::GetCustomer => (MethodFilter::GET, "/v1/customers/{id}"),
            Self::GetCustomerByBookId => (MethodFilter::GET, "/v1/books/{book_id}/customers"),
        }
    }

    /// gRPC method path, e.g. `/customer.v1.CustomerService/GetCustomer`.
    pub fn grpc_path(self) -> String {
        let method: &'static str = self.into();
        format!("/customer.v1.CustomerService/{method}")
    }

    fn handler(self) -> MethodRouter<GatewayState> {
        let (filter, _) = self.http_rule();
        match self {
            Self::CreateCustomer => on(filter, gateway::create_customer),
            Self::SearchCustomer => on(filter, gateway::search_customer),
            Self::GetCustomer => on(filter, gateway::get_customer),
            Self::GetCustomerByBookId => on(filter, gateway::get_customer_by_book_id),
        }
    }
}

/// Gateway routes for every RPC of the translation table.
///
/// The caller adds the pre-call hook, the not-found fallback and CORS.
pub fn router(service: GatewayState) -> Router {
    CustomerRpc::iter()
        .fold(Router::new(), |router, rpc| {
            router.route(rpc.http_rule().1, rpc.handler())
        })
        .with_state(service)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        gateway::create_customer,
        gateway::search_customer,
        gateway::get_customer,
        gateway::get_customer_by_book_id,
    ),
    components(schemas(
        Contact,
        Customer,
        CreateCustomerRequest,
        CreateCustomerResponse,
        SearchCustomerRequest,
        SearchCustomerResponse,
        GetCustomerResponse,
        GetCustomerByBookIdResponse,
        GatewayErrorBody,
    )),
    tags(
        (name = "customers", description = "customer.v1.CustomerService over JSON")
    )
)]
pub struct CustomerApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_every_rpc() {
        assert_eq!(CustomerRpc::iter().collect::<Vec<_>>(), CustomerRpc::ALL);

        let paths: Vec<_> = CustomerRpc::ALL.iter().map(|rpc| rpc.http_rule().1).collect();
        assert_eq!(
            paths,
            [
                "/v1/customers",
                "/v1/customers:search",
                "/v1/customers/{id}",
                "/v1/books/{book_id}/customers",
            ]
        );
    }

    #[test]
    fn test_grpc_path() {
        assert_eq!(
            CustomerRpc::GetCustomerByBookId.grpc_path(),
            "/customer.v1.CustomerService/GetCustomerByBookId"
        );
    }

    #[test]
    fn test_openapi_lists_gateway_paths() {
        let doc = CustomerApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/v1/customers"));
        assert!(doc.paths.paths.contains_key("/v1/customers:search"));
        assert!(doc.paths.paths.contains_key("/v1/customers/{id}"));
        assert!(doc.paths.paths.contains_key("/v1/books/{book_id}/customers"));
    }
}
