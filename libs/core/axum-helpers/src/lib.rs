//! # Axum Helpers
//!
//! HTTP-side building blocks for the JSON surface.
//!
//! ## Modules
//!
//! - **[`gateway`]**: translating HTTP calls into in-process gRPC calls, with
//!   the pre-call / post-call logging hooks and the gateway error body
//! - **[`http`]**: CORS policy and the whole-request access logger
//! - **[`server`]**: [`HttpServerUnit`], an axum server run as a supervised unit
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::{Router, middleware};
//! use axum_helpers::{HttpServerUnit, gateway, gateway_cors_layer};
//!
//! let router = Router::new()
//!     .route("/v1/customers/{id}", get(get_customer))
//!     .fallback(gateway::not_found)
//!     .layer(middleware::from_fn(gateway::pre_call))
//!     .layer(gateway_cors_layer());
//!
//! let unit = HttpServerUnit::bind(&config, router, shutdown.grace).await?;
//! supervisor.with_unit(unit);
//! ```

pub mod gateway;
pub mod http;
pub mod server;

pub use gateway::{Call, CallCarrier, GatewayError, forward_response, post_call, pre_call};
pub use http::{access_log, gateway_cors_layer};
pub use server::HttpServerUnit;
