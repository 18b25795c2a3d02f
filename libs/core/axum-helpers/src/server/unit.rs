use std::io;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use core_config::server::ServerConfig;
use lifecycle::{Drain, Unit, UnitError};
use tokio::net::TcpListener;
use tracing::{info, warn};

/// An axum server run as a supervised unit.
///
/// The listener is bound in [`bind`](Self::bind). On stop the server stops
/// accepting and lets open requests finish. After `grace` the unit stops
/// waiting: the listener is closed and `serve` returns, while connections
/// that are still open end with their requests or when the process exits.
pub struct HttpServerUnit {
    name: String,
    local_addr: SocketAddr,
    pending: Mutex<Option<(TcpListener, Router)>>,
    drain: Drain,
}

impl HttpServerUnit {
    pub async fn bind(
        config: &ServerConfig,
        router: Router,
        grace: Duration,
    ) -> Result<Self, UnitError> {
        let addr = config
            .socket_addr()
            .map_err(|e| UnitError::Bind(io::Error::new(io::ErrorKind::InvalidInput, e)))?;
        let listener = TcpListener::bind(addr).await.map_err(UnitError::Bind)?;
        let local_addr = listener.local_addr().map_err(UnitError::Bind)?;

        Ok(Self {
            name: "gateway".to_string(),
            local_addr,
            pending: Mutex::new(Some((listener, router))),
            drain: Drain::new(grace),
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    fn take_pending(&self) -> Option<(TcpListener, Router)> {
        self.pending.lock().ok().and_then(|mut pending| pending.take())
    }
}

#[async_trait]
impl Unit for HttpServerUnit {
    fn name(&self) -> &str {
        &self.name
    }

    async fn serve(&self) -> Result<(), UnitError> {
        self.drain.begin()?;
        let Some((listener, router)) = self.take_pending() else {
            self.drain.finish();
            return Err(UnitError::Closed);
        };

        info!(unit = %self.name, addr = %self.local_addr, "HTTP server listening");

        let stop = self.drain.stop_signal();
        let server = async move {
            axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async move { stop.triggered().await })
            .await
        };

        let result = tokio::select! {
            result = server => result.map_err(UnitError::failed),
            _ = self.drain.grace_expired() => {
                warn!(
                    unit = %self.name,
                    grace_secs = self.drain.grace().as_secs_f64(),
                    "Drain grace period expired, no longer waiting for open connections"
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
        self.drain.request_stop().await;
    }
}
