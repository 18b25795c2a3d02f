use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router, middleware};
use axum_helpers::{access_log, gateway, gateway_cors_layer};
use domain_customers::{CustomerApiDoc, handlers};
use rpc::customer::customer_service_server::CustomerService;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub const DOCS_PATH: &str = "/swagger";
pub const OPENAPI_PATH: &str = "/swagger/openapi.json";
pub const METRICS_PATH: &str = "/metrics";

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(CustomerApiDoc::openapi())
}

/// The HTTP surface: gateway routes at the root, docs and metrics beside them.
///
/// Gateway calls are logged by the pre/post-call hooks, everything else by
/// the access logger.
pub fn router(service: Arc<dyn CustomerService>) -> Router {
    let gateway_routes = handlers::router(service)
        .fallback(gateway::not_found)
        .layer(middleware::from_fn(gateway::pre_call));

    let static_routes = Router::new()
        .merge(Scalar::with_url(DOCS_PATH, CustomerApiDoc::openapi()))
        .route(OPENAPI_PATH, get(openapi_json))
        .route(METRICS_PATH, get(observability::metrics_handler))
        .layer(middleware::from_fn(access_log));

    static_routes
        .merge(gateway_routes)
        .layer(gateway_cors_layer())
}
