//! Redis connection management for the task streams

mod connector;

pub use connector::{connect, connect_with_config};

pub use redis::aio::{ConnectionManager, ConnectionManagerConfig};
pub use redis::{AsyncCommands, Client, RedisResult};
