//! # gRPC helpers
//!
//! Server-side building blocks for the gRPC surface:
//!
//! - [`server::GrpcServerUnit`]: a tonic server bound at construction time and
//!   run as a `lifecycle::Unit`, with health reporting and a bounded drain
//! - [`interceptors::GrpcLoggingLayer`]: exactly one request record per call
//! - [`status`]: canonical code names and the gRPC to HTTP status table
//! - [`error`] and [`conversions`]: turning domain values into `tonic::Status`
//!   and proto strings
//!
//! ```ignore
//! use grpc_helpers::server::{GrpcServerUnit, ServerConfig};
//! use rpc::customer::customer_service_server::{CustomerServiceServer, SERVICE_NAME};
//! use tonic::service::Routes;
//!
//! let config = ServerConfig::from_env()?;
//! let routes = Routes::new(CustomerServiceServer::from_arc(service));
//! let unit = GrpcServerUnit::bind(config, routes, &[SERVICE_NAME]).await?;
//! ```

pub mod conversions;
pub mod error;
pub mod interceptors;
pub mod server;
pub mod status;

pub use error::{ToTonicOption, ToTonicResult};
pub use interceptors::{CodeToLevel, GrpcLoggingLayer};
pub use server::{GrpcServerUnit, ServerConfig};
