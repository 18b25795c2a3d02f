//! Shared test utilities
//!
//! - `LogCapture`: captures `tracing` events as JSON for assertions on log output
//! - `TestRedis`: Redis container with automatic cleanup (feature: "redis")
//!
//! ## Redis Testing
//!
//! Add `features = ["redis"]` to your dev-dependencies:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { workspace = true, features = ["redis"] }
//! ```
//!
//! Tests that need a container are `#[ignore]`d and run with
//! `cargo test -- --ignored` where Docker is available.

mod logs;
#[cfg(feature = "redis")]
mod redis;

pub use logs::LogCapture;
#[cfg(feature = "redis")]
pub use redis::TestRedis;
