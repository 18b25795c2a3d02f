use core_config::redis::RedisConfig;
use core_config::server::ServerConfig;
use core_config::shutdown::ShutdownConfig;
use core_config::{Environment, FromEnv};
use database::postgres::PostgresConfig;
use email::{SenderConfig, SmtpConfig};
use eyre::WrapErr;

/// Process configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: Environment,
    /// Gateway, docs and metrics listener (`HOST` / `PORT`)
    pub http: ServerConfig,
    /// gRPC listener (`GRPC_HOST` / `GRPC_PORT`)
    pub grpc: grpc_helpers::ServerConfig,
    pub shutdown: ShutdownConfig,
    pub database: PostgresConfig,
    /// Enables the task processor when set
    pub redis: Option<RedisConfig>,
    /// Without SMTP the task processor logs mails instead of sending them
    pub smtp: Option<SmtpConfig>,
    pub sender: SenderConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let shutdown = ShutdownConfig::from_env().wrap_err("loading shutdown config")?;
        let grpc = grpc_helpers::ServerConfig::from_env()
            .wrap_err("loading gRPC server config")?
            .with_shutdown_grace(shutdown.grace);

        Ok(Self {
            environment: Environment::from_env(),
            http: ServerConfig::from_env().wrap_err("loading HTTP server config")?,
            grpc,
            shutdown,
            database: PostgresConfig::from_env().wrap_err("loading database config")?,
            redis: RedisConfig::from_env_optional().wrap_err("loading Redis config")?,
            smtp: SmtpConfig::from_env_optional().wrap_err("loading SMTP config")?,
            sender: SenderConfig::from_env().wrap_err("loading e-mail sender config")?,
        })
    }
}
