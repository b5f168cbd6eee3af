//! Router configuration

use super::defaults::RouterDefaults;
use super::{parse_var, ConfigError};
use serde::{Deserialize, Serialize};
use std::env;

/// Settings a [`Router`](crate::routing::Router) can be built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Only resources declaring this scope (or none) are scanned; empty accepts all
    pub scope: String,
    /// Keep running matched routes after one has sent a response
    pub continue_routing_after_response_sent: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            scope: RouterDefaults::SCOPE.to_string(),
            continue_routing_after_response_sent: RouterDefaults::CONTINUE_ROUTING_AFTER_RESPONSE_SENT,
        }
    }
}

impl RouterConfig {
    /// Read `TRELLIS_SCOPE` and `TRELLIS_CONTINUE_AFTER_RESPONSE`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            scope: lookup("TRELLIS_SCOPE")
                .map(|scope| scope.trim().to_string())
                .unwrap_or_else(|| RouterDefaults::SCOPE.to_string()),
            continue_routing_after_response_sent: parse_var(
                &lookup,
                "TRELLIS_CONTINUE_AFTER_RESPONSE",
                "continue_routing_after_response_sent",
                "true or false",
                RouterDefaults::CONTINUE_ROUTING_AFTER_RESPONSE_SENT,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scope.chars().any(char::is_whitespace) {
            return Err(ConfigError::validation_failed(
                "Router scope must not contain whitespace",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RouterConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, RouterConfig::default());
        assert_eq!(config.scope, "");
        assert!(!config.continue_routing_after_response_sent);
    }

    #[test]
    fn test_reads_variables() {
        let config = RouterConfig::from_lookup(lookup(&[
            ("TRELLIS_SCOPE", " admin "),
            ("TRELLIS_CONTINUE_AFTER_RESPONSE", "true"),
        ]))
        .unwrap();
        assert_eq!(config.scope, "admin");
        assert!(config.continue_routing_after_response_sent);
    }

    #[test]
    fn test_rejects_bad_values() {
        let error =
            RouterConfig::from_lookup(lookup(&[("TRELLIS_CONTINUE_AFTER_RESPONSE", "maybe")]))
                .unwrap_err();
        assert!(matches!(error, ConfigError::InvalidValue { .. }));

        let config = RouterConfig {
            scope: "two words".into(),
            ..RouterConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserializes_with_defaults() {
        let config: RouterConfig = serde_json::from_str(r#"{"scope":"api"}"#).unwrap();
        assert_eq!(config.scope, "api");
        assert!(!config.continue_routing_after_response_sent);
    }
}
