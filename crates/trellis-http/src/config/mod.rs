//! Router and server configuration
//!
//! Both configs deserialize with serde, default from the constants in
//! [`defaults`], and can be read from `TRELLIS_*` environment variables.

pub mod defaults;
pub mod router_config;
pub mod server_config;

pub use defaults::{RouterDefaults, ServerDefaults};
pub use router_config::RouterConfig;
pub use server_config::ServerConfig;

use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {field}: expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Configuration validation failed: {message}")]
    ValidationFailed { message: String },
}

impl ConfigError {
    pub fn validation_failed<T: Into<String>>(message: T) -> Self {
        ConfigError::ValidationFailed {
            message: message.into(),
        }
    }
}

/// Read `key` through `lookup` and parse it, falling back to `default` when unset
pub(crate) fn parse_var<T, F>(
    lookup: &F,
    key: &str,
    field: &str,
    expected: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
            field: field.to_string(),
            value: raw,
            expected: expected.to_string(),
        }),
    }
}
