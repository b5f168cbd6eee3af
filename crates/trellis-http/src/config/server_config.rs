//! Dispatch server configuration

use super::defaults::ServerDefaults;
use super::{parse_var, ConfigError};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Settings for [`RestServer`](crate::server::RestServer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Requests handled at the same time
    pub max_concurrent_requests: usize,
    /// How long `run` waits for in-flight requests after a stop
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: ServerDefaults::MAX_CONCURRENT_REQUESTS,
            shutdown_timeout_secs: ServerDefaults::SHUTDOWN_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    /// Read `TRELLIS_MAX_CONCURRENT_REQUESTS` and `TRELLIS_SHUTDOWN_TIMEOUT`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            max_concurrent_requests: parse_var(
                &lookup,
                "TRELLIS_MAX_CONCURRENT_REQUESTS",
                "max_concurrent_requests",
                "a positive number of requests",
                ServerDefaults::MAX_CONCURRENT_REQUESTS,
            )?,
            shutdown_timeout_secs: parse_var(
                &lookup,
                "TRELLIS_SHUTDOWN_TIMEOUT",
                "shutdown_timeout_secs",
                "valid number of seconds",
                ServerDefaults::SHUTDOWN_TIMEOUT_SECS,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_requests == 0 {
            return Err(ConfigError::validation_failed(
                "Maximum concurrent requests must be greater than 0",
            ));
        }
        if self.shutdown_timeout_secs == 0 {
            return Err(ConfigError::validation_failed(
                "Shutdown timeout must be greater than 0",
            ));
        }
        Ok(())
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}
