//! Customers Domain
//!
//! The customer-book operations behind `customer.v1.CustomerService`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   ┌────────────────────┐
//! │ gRPC (tonic)     │   │ HTTP gateway (axum)│
//! └────────┬─────────┘   └─────────┬──────────┘
//!          │    CustomerServer     │
//!          └──────────┬────────────┘
//!              ┌──────▼──────┐
//!              │ Repository  │  ← CustomerRepository port
//!              └──────┬──────┘
//!              ┌──────▼──────┐
//!              │  Postgres   │  ← SeaORM entities
//!              └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_customers::{CustomerServer, PgCustomerRepository, handlers};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = database::postgres::connect("postgres://...").await?;
//! let server = Arc::new(CustomerServer::new(PgCustomerRepository::new(db)));
//!
//! let grpc = rpc::customer::customer_service_server::CustomerServiceServer::from_arc(server.clone());
//! let http = handlers::router(server);
//! # Ok(())
//! # }
//! ```

pub mod conversions;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{DataError, DataResult};
pub use handlers::{CustomerApiDoc, CustomerRpc};
pub use models::{
    Contact, Customer, CustomerDetail, CustomerFilter, NewContact, NewCustomer, NewStaff, Page,
    Staff,
};
pub use postgres::PgCustomerRepository;
pub use repository::CustomerRepository;
#[cfg(any(test, feature = "mocks"))]
pub use repository::MockCustomerRepository;
pub use service::CustomerServer;
