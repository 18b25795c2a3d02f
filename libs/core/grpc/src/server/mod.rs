//! gRPC server unit.
//!
//! ```ignore
//! use grpc_helpers::server::{GrpcServerUnit, ServerConfig};
//! use rpc::customer::customer_service_server::{CustomerServiceServer, SERVICE_NAME};
//! use tonic::service::Routes;
//!
//! let config = ServerConfig::from_env()?;
//! let service = CustomerServiceServer::from_arc(customers)
//!     .max_decoding_message_size(config.max_decoding_message_size);
//!
//! let unit = GrpcServerUnit::bind(config, Routes::new(service), &[SERVICE_NAME]).await?;
//! supervisor.with_unit(unit);
//! ```

mod config;
mod unit;

pub use config::ServerConfig;
pub use unit::GrpcServerUnit;
