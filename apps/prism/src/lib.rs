//! Prism backend process.
//!
//! One [`CustomerServer`] is shared by three supervised units:
//!
//! - `grpc`: tonic server for `customer.v1.CustomerService` plus `grpc.health.v1`
//! - `gateway`: axum server translating JSON over HTTP into in-process calls,
//!   with the API docs under `/swagger` and Prometheus metrics under `/metrics`
//! - `tasks` (only with `REDIS_URL`): Redis Streams worker sending the
//!   confirmation e-mails the service enqueues
//!
//! Construction errors are returned before anything runs; once assembled,
//! the [`Supervisor`] owns the process until shutdown.

pub mod config;
pub mod grpc;
pub mod http;
pub mod tasks;

use std::net::SocketAddr;
use std::sync::Arc;

use axum_helpers::HttpServerUnit;
use domain_customers::{CustomerRepository, CustomerServer};
use email::RedisTaskDistributor;
use eyre::WrapErr;
use grpc_helpers::GrpcServerUnit;
use lifecycle::{ShutdownSignal, Supervisor};
use tracing::info;

pub use config::Config;

/// Units bound and ready to run
pub struct App {
    pub supervisor: Supervisor,
    pub grpc_addr: SocketAddr,
    pub http_addr: SocketAddr,
}

/// Build every unit of the process over `repository`.
///
/// Listeners are bound here, so an unusable address fails before the
/// supervisor starts.
pub async fn assemble<R: CustomerRepository>(config: &Config, repository: R) -> eyre::Result<App> {
    let mut server = CustomerServer::new(repository);

    let tasks = match &config.redis {
        Some(redis) => {
            server = server.with_distributor(Arc::new(RedisTaskDistributor::new(redis)));
            Some(tasks::task_unit(redis, config.smtp.as_ref(), config.sender.clone())?)
        }
        None => {
            info!("REDIS_URL not set, running without the task processor");
            None
        }
    };
    let server = Arc::new(server);

    let grpc = GrpcServerUnit::bind(
        config.grpc.clone(),
        grpc::routes(Arc::clone(&server), &config.grpc),
        grpc::SERVICES,
    )
    .await
    .wrap_err_with(|| format!("binding gRPC listener on {}", config.grpc.addr_string()))?;

    let http = HttpServerUnit::bind(&config.http, http::router(server), config.shutdown.grace)
        .await
        .wrap_err_with(|| format!("binding HTTP listener on {}", config.http.address()))?;

    let grpc_addr = grpc.local_addr();
    let http_addr = http.local_addr();

    let mut supervisor = Supervisor::new(ShutdownSignal::new())
        .with_shutdown_deadline(config.shutdown.deadline)
        .with_unit(grpc)
        .with_unit(http);
    if let Some(tasks) = tasks {
        supervisor = supervisor.with_unit(tasks);
    }

    Ok(App {
        supervisor,
        grpc_addr,
        http_addr,
    })
}
