//! Connection helpers for the stores behind the customer service.
//!
//! # Features
//!
//! - `postgres` (default) - PostgreSQL pool via SeaORM
//! - `redis` (default) - Redis `ConnectionManager` for the task streams
//! - `config` (default) - `core_config::FromEnv` for [`postgres::PostgresConfig`]
//!
//! ```ignore
//! use database::common::RetryConfig;
//! use database::postgres::{PostgresConfig, connect_from_config_with_retry};
//!
//! let db = connect_from_config_with_retry(PostgresConfig::from_env()?, Some(RetryConfig::new())).await?;
//! let redis = database::redis::connect("redis://127.0.0.1:6379").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "redis")]
pub mod redis;
