use core_config::{env_flag, env_optional, env_or_default, env_parse, ConfigError, FromEnv};

/// The `From:` identity of outgoing mail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SenderConfig {
    pub from_name: String,
    pub from_address: String,
}

impl SenderConfig {
    pub fn new(from_name: impl Into<String>, from_address: impl Into<String>) -> Self {
        Self {
            from_name: from_name.into(),
            from_address: from_address.into(),
        }
    }

    /// `Name <address>` as used in the `From:` header
    pub fn mailbox(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_address)
    }
}

impl FromEnv for SenderConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            from_name: env_or_default("EMAIL_FROM_NAME", "Prism"),
            from_address: env_or_default("EMAIL_FROM_ADDRESS", "noreply@localhost"),
        })
    }
}

/// SMTP relay settings
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub use_tls: bool,
}

impl SmtpConfig {
    /// Reads `SMTP_*`; `None` when `SMTP_HOST` is unset, in which case mail
    /// is only logged.
    pub fn from_env_optional() -> Result<Option<Self>, ConfigError> {
        let Some(host) = env_optional("SMTP_HOST") else {
            return Ok(None);
        };

        Ok(Some(Self {
            host,
            port: env_parse("SMTP_PORT", 587)?,
            username: env_or_default("SMTP_USERNAME", ""),
            password: env_or_default("SMTP_PASSWORD", ""),
            use_tls: env_flag("SMTP_USE_TLS", true),
        }))
    }
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("use_tls", &self.use_tls)
            .finish()
    }
}
