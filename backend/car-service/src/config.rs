/// Configuration management
use chrono::Duration;
use serde::Deserialize;
use std::fmt;

use crate::security::jwt::MAX_LEEWAY_SECS;

/// Process-wide settings, read once at startup.
///
/// Database settings are read separately through `db_pool::DbConfig`.
#[derive(Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_app_host")]
    pub app_host: String,

    #[serde(default = "default_app_port")]
    pub app_port: u16,

    /// HS256 signing secret, at least 32 bytes
    pub jwt_secret: String,

    /// Access token lifetime in seconds
    #[serde(default = "default_jwt_access_token_ttl")]
    pub jwt_access_token_ttl: i64,

    /// Clock skew tolerated when checking expiry
    #[serde(default)]
    pub jwt_leeway_secs: u64,

    /// How often expired revocation records are pruned; 0 disables pruning
    #[serde(default = "default_revocation_cleanup_interval_secs")]
    pub revocation_cleanup_interval_secs: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("app_host", &self.app_host)
            .field("app_port", &self.app_port)
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_access_token_ttl", &self.jwt_access_token_ttl)
            .field("jwt_leeway_secs", &self.jwt_leeway_secs)
            .field(
                "revocation_cleanup_interval_secs",
                &self.revocation_cleanup_interval_secs,
            )
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenv::dotenv().ok();

        let config: Config = envy::from_env()?;
        if config.jwt_access_token_ttl <= 0 {
            return Err(envy::Error::Custom(format!(
                "JWT_ACCESS_TOKEN_TTL must be positive, got {}",
                config.jwt_access_token_ttl
            )));
        }
        if config.jwt_leeway_secs > MAX_LEEWAY_SECS {
            return Err(envy::Error::Custom(format!(
                "JWT_LEEWAY_SECS must be at most {}, got {}",
                MAX_LEEWAY_SECS, config.jwt_leeway_secs
            )));
        }

        Ok(config)
    }

    pub fn access_token_ttl(&self) -> Duration {
        Duration::seconds(self.jwt_access_token_ttl)
    }
}

fn default_app_host() -> String {
    "0.0.0.0".to_string()
}

fn default_app_port() -> u16 {
    8080
}

fn default_jwt_access_token_ttl() -> i64 {
    3600 // 1 hour
}

fn default_revocation_cleanup_interval_secs() -> u64 {
    3600
}
