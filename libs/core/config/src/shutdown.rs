use crate::{env_parse, ConfigError, FromEnv};
use std::time::Duration;

/// Shutdown timing shared by every unit of the process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShutdownConfig {
    /// How long a unit may drain in-flight work after stop was requested.
    pub grace: Duration,
    /// Hard limit for the whole process shutdown. `None` disables it.
    pub deadline: Option<Duration>,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(30),
            deadline: None,
        }
    }
}

impl FromEnv for ShutdownConfig {
    /// Reads:
    /// - `SHUTDOWN_GRACE_SECS` (default: 30)
    /// - `SHUTDOWN_DEADLINE_SECS` (default: unset, `0` also disables)
    fn from_env() -> Result<Self, ConfigError> {
        let grace = env_parse("SHUTDOWN_GRACE_SECS", 30u64)?;
        let deadline = env_parse("SHUTDOWN_DEADLINE_SECS", 0u64)?;

        Ok(Self {
            grace: Duration::from_secs(grace),
            deadline: (deadline > 0).then(|| Duration::from_secs(deadline)),
        })
    }
}
