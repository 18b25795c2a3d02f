use std::io;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use lifecycle::{Drain, Unit, UnitError};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::service::Routes;
use tonic::transport::Server;
use tonic_health::ServingStatus;
use tonic_health::server::HealthReporter;
use tracing::{info, warn};

use super::ServerConfig;
use crate::interceptors::{CodeToLevel, GrpcLoggingLayer, default_level};

/// A tonic server run as a supervised unit.
///
/// The listener is bound in [`bind`](Self::bind), so an unusable address fails
/// before anything is started. `serve` runs until [`Unit::stop`] is called;
/// stop marks every service NOT_SERVING, stops accepting connections and waits
/// for in-flight calls for at most [`ServerConfig::shutdown_grace`]. Calls
/// still running after that keep their connection until they finish or the
/// process exits.
pub struct GrpcServerUnit {
    name: String,
    config: ServerConfig,
    local_addr: SocketAddr,
    pending: Mutex<Option<(TcpListener, Routes)>>,
    services: Vec<&'static str>,
    health: HealthReporter,
    code_to_level: CodeToLevel,
    drain: Drain,
}

impl GrpcServerUnit {
    /// Bind the listener and register `grpc.health.v1` next to `routes`.
    ///
    /// `services` are the fully qualified names reported by the health service.
    pub async fn bind(
        config: ServerConfig,
        routes: Routes,
        services: &[&'static str],
    ) -> Result<Self, UnitError> {
        let addr = config
            .socket_addr()
            .map_err(|e| UnitError::Bind(io::Error::new(io::ErrorKind::InvalidInput, e)))?;
        let listener = TcpListener::bind(addr).await.map_err(UnitError::Bind)?;
        let local_addr = listener.local_addr().map_err(UnitError::Bind)?;

        let (health, health_service) = tonic_health::server::health_reporter();
        let routes = routes.add_service(health_service);
        let drain = Drain::new(config.shutdown_grace);

        Ok(Self {
            name: "grpc".to_string(),
            config,
            local_addr,
            pending: Mutex::new(Some((listener, routes))),
            services: services.to_vec(),
            health,
            code_to_level: default_level,
            drain,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_code_to_level(mut self, code_to_level: CodeToLevel) -> Self {
        self.code_to_level = code_to_level;
        self
    }

    /// Address actually bound, useful with port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn health_reporter(&self) -> HealthReporter {
        self.health.clone()
    }

    async fn set_status(&self, status: ServingStatus) {
        // "" is the overall server status.
        self.health.set_service_status("", status).await;
        for service in &self.services {
            self.health.set_service_status(service, status).await;
        }
    }

    fn take_pending(&self) -> Option<(TcpListener, Routes)> {
        self.pending.lock().ok().and_then(|mut pending| pending.take())
    }
}

#[async_trait]
impl Unit for GrpcServerUnit {
    fn name(&self) -> &str {
        &self.name
    }

    async fn serve(&self) -> Result<(), UnitError> {
        self.drain.begin()?;
        let Some((listener, routes)) = self.take_pending() else {
            self.drain.finish();
            return Err(UnitError::Closed);
        };

        self.set_status(ServingStatus::Serving).await;
        info!(
            unit = %self.name,
            addr = %self.local_addr,
            services = ?self.services,
            compression = self.config.enable_compression,
            "gRPC server listening"
        );

        let server = Server::builder()
            .tcp_keepalive(Some(Duration::from_secs(self.config.keepalive_secs)))
            .layer(GrpcLoggingLayer::with_code_to_level(self.code_to_level))
            .add_routes(routes)
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), self.drain.stop_requested());

        let result = tokio::select! {
            result = server => result.map_err(UnitError::failed),
            _ = self.drain.grace_expired() => {
                warn!(
                    unit = %self.name,
                    grace_secs = self.drain.grace().as_secs_f64(),
                    "Drain grace period expired, no longer waiting for in-flight calls"
                );
                Ok(())
            }
        };
        self.drain.finish();

        match result {
            Ok(()) if self.drain.is_stop_requested() => Err(UnitError::Closed),
            other => other,
        }
    }

    async fn stop(&self) {
        self.set_status(ServingStatus::NotServing).await;
        self.drain.request_stop().await;
    }
}
