//! Server configuration loaded from environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use core_config::{ConfigError, FromEnv, env_flag, env_or_default, env_parse};

const DEFAULT_MESSAGE_SIZE: usize = 8 * 1024 * 1024;

/// Configuration for the gRPC server unit.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to (default: 0.0.0.0)
    pub host: String,
    /// Port to listen on (default: 9090)
    pub port: u16,
    /// Enable Zstd compression (default: true)
    pub enable_compression: bool,
    /// Maximum message size for decoding (default: 8MB)
    pub max_decoding_message_size: usize,
    /// Maximum message size for encoding (default: 8MB)
    pub max_encoding_message_size: usize,
    /// TCP keepalive interval in seconds (default: 60)
    pub keepalive_secs: u64,
    /// How long in-flight calls may run after stop (default: 30s)
    pub shutdown_grace: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9090,
            enable_compression: true,
            max_decoding_message_size: DEFAULT_MESSAGE_SIZE,
            max_encoding_message_size: DEFAULT_MESSAGE_SIZE,
            keepalive_secs: 60,
            shutdown_grace: Duration::from_secs(30),
        }
    }
}

impl FromEnv for ServerConfig {
    /// Reads:
    /// - `GRPC_HOST` (default: 0.0.0.0)
    /// - `GRPC_PORT` (default: 9090)
    /// - `GRPC_COMPRESSION` (default: true)
    /// - `GRPC_MAX_MESSAGE_SIZE` (default: 8388608 / 8MB)
    /// - `SHUTDOWN_GRACE_SECS` (default: 30)
    fn from_env() -> Result<Self, ConfigError> {
        let max_message_size = env_parse("GRPC_MAX_MESSAGE_SIZE", DEFAULT_MESSAGE_SIZE)?;

        Ok(Self {
            host: env_or_default("GRPC_HOST", "0.0.0.0"),
            port: env_parse("GRPC_PORT", 9090)?,
            enable_compression: env_flag("GRPC_COMPRESSION", true),
            max_decoding_message_size: max_message_size,
            max_encoding_message_size: max_message_size,
            keepalive_secs: 60,
            shutdown_grace: Duration::from_secs(env_parse("SHUTDOWN_GRACE_SECS", 30)?),
        })
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_compression(mut self, enable: bool) -> Self {
        self.enable_compression = enable;
        self
    }

    pub fn with_max_message_size(mut self, size: usize) -> Self {
        self.max_decoding_message_size = size;
        self.max_encoding_message_size = size;
        self
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.addr_string()
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::ParseError {
                key: "GRPC_HOST".to_string(),
                details: e.to_string(),
            })
    }

    /// Get the address string (for logging).
    pub fn addr_string(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 5] = [
        "GRPC_HOST",
        "GRPC_PORT",
        "GRPC_COMPRESSION",
        "GRPC_MAX_MESSAGE_SIZE",
        "SHUTDOWN_GRACE_SECS",
    ];

    #[test]
    fn test_default_config() {
        temp_env::with_vars_unset(VARS, || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config.addr_string(), "0.0.0.0:9090");
            assert!(config.enable_compression);
            assert_eq!(config.max_decoding_message_size, DEFAULT_MESSAGE_SIZE);
            assert_eq!(config.shutdown_grace, Duration::from_secs(30));
        });
    }

    #[test]
    fn test_config_from_env() {
        temp_env::with_vars(
            [
                ("GRPC_HOST", Some("127.0.0.1")),
                ("GRPC_PORT", Some("50051")),
                ("GRPC_COMPRESSION", Some("false")),
                ("GRPC_MAX_MESSAGE_SIZE", Some("1024")),
                ("SHUTDOWN_GRACE_SECS", Some("5")),
            ],
            || {
                let config = ServerConfig::from_env().unwrap();
                assert_eq!(config.socket_addr().unwrap().port(), 50051);
                assert!(!config.enable_compression);
                assert_eq!(config.max_encoding_message_size, 1024);
                assert_eq!(config.shutdown_grace, Duration::from_secs(5));
            },
        );
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        temp_env::with_var("GRPC_PORT", Some("grpc"), || {
            assert!(ServerConfig::from_env().is_err());
        });
    }

    #[test]
    fn test_builder_methods() {
        let config = ServerConfig::new()
            .with_host("127.0.0.1")
            .with_port(0)
            .with_compression(false)
            .with_max_message_size(4096);
        assert_eq!(config.addr_string(), "127.0.0.1:0");
        assert!(!config.enable_compression);
        assert_eq!(config.max_decoding_message_size, 4096);
    }
}
