use redis::Client;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use tracing::info;

/// Connect to Redis and verify the connection with `PING`.
///
/// The returned `ConnectionManager` reconnects on its own after later failures.
///
/// ```ignore
/// let mut conn = database::redis::connect("redis://127.0.0.1:6379").await?;
/// ```
pub async fn connect(url: &str) -> redis::RedisResult<ConnectionManager> {
    connect_with_config(url, ConnectionManagerConfig::new()).await
}

/// [`connect`] with explicit timeouts and reconnect behaviour.
///
/// Connections that issue blocking commands (`XREADGROUP ... BLOCK`) need a
/// response timeout longer than the block time.
pub async fn connect_with_config(
    url: &str,
    config: ConnectionManagerConfig,
) -> redis::RedisResult<ConnectionManager> {
    let client = Client::open(url)?;
    let manager = ConnectionManager::new_with_config(client, config).await?;

    let mut conn = manager.clone();
    let _: String = redis::cmd("PING").query_async(&mut conn).await?;

    info!("Connected to Redis");
    Ok(manager)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_invalid_url() {
        assert!(connect("not a redis url").await.is_err());
    }

    #[tokio::test]
    #[ignore = "requires Redis"]
    async fn test_connect() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

        assert!(connect(&redis_url).await.is_ok());
    }
}
