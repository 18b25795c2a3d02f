//! Redis container for stream tests.

use redis::Client;
use redis::aio::MultiplexedConnection;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::redis::Redis;

/// Redis 8 container, removed when dropped.
pub struct TestRedis {
    _container: ContainerAsync<Redis>,
    connection: MultiplexedConnection,
    pub url: String,
}

impl TestRedis {
    pub async fn new() -> Self {
        let container = Redis::default()
            .with_tag("8-alpine")
            .start()
            .await
            .expect("Failed to start Redis container");

        let port = container
            .get_host_port_ipv4(6379)
            .await
            .expect("Failed to get Redis port");
        let url = format!("redis://127.0.0.1:{port}");

        let connection = Client::open(url.as_str())
            .expect("Failed to create Redis client")
            .get_multiplexed_async_connection()
            .await
            .expect("Failed to connect to Redis");

        tracing::info!(port, "Test Redis ready");

        Self {
            _container: container,
            connection,
            url,
        }
    }

    pub fn connection(&self) -> MultiplexedConnection {
        self.connection.clone()
    }

    /// Number of entries currently in `stream`.
    pub async fn stream_len(&self, stream: &str) -> usize {
        redis::cmd("XLEN")
            .arg(stream)
            .query_async(&mut self.connection())
            .await
            .expect("XLEN failed")
    }

    /// Entries of `stream` delivered to `group` and not yet acknowledged.
    pub async fn pending_count(&self, stream: &str, group: &str) -> usize {
        let (count, _, _, _): (usize, redis::Value, redis::Value, redis::Value) =
            redis::cmd("XPENDING")
                .arg(stream)
                .arg(group)
                .query_async(&mut self.connection())
                .await
                .expect("XPENDING failed");
        count
    }
}
