use crate::{env_optional, ConfigError};

/// Redis configuration
///
/// Redis is optional for the process: without `REDIS_URL` the background
/// task processor is not started.
#[derive(Clone, Debug)]
pub struct RedisConfig {
    pub url: String,
}

impl RedisConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Reads `REDIS_URL`; returns `None` when unset or blank.
    pub fn from_env_optional() -> Result<Option<Self>, ConfigError> {
        let Some(url) = env_optional("REDIS_URL") else {
            return Ok(None);
        };

        if !(url.starts_with("redis://") || url.starts_with("rediss://")) {
            return Err(ConfigError::ParseError {
                key: "REDIS_URL".to_string(),
                details: format!("expected a redis:// or rediss:// url, got '{url}'"),
            });
        }

        Ok(Some(Self { url }))
    }
}
