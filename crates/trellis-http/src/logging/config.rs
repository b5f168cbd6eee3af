//! Subscriber setup for hosts that want trellis output on stdout

use serde_json::{json, Value};
use std::io;
use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How [`init_logging`] builds the global subscriber
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level used when no filter directive is given
    pub level: String,
    /// Emit JSON lines instead of text
    pub json_format: bool,
    pub pretty_print: bool,
    /// Filter directives such as "trellis=debug,my_app=info"
    pub env_filter: Option<String>,
    /// Fields echoed in the startup line
    pub global_fields: serde_json::Map<String, Value>,
    pub service_name: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            pretty_print: false,
            env_filter: None,
            global_fields: serde_json::Map::new(),
            service_name: None,
        }
    }
}

impl LoggingConfig {
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            json_format: true,
            env_filter: Some("trellis=info".to_string()),
            ..Self::default()
        }
        .with_global_field("env", "production")
    }

    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            pretty_print: true,
            env_filter: Some("trellis=debug".to_string()),
            ..Self::default()
        }
        .with_global_field("env", "development")
    }

    /// Errors only
    pub fn test() -> Self {
        Self {
            level: "error".to_string(),
            env_filter: Some("trellis=error".to_string()),
            ..Self::default()
        }
    }

    pub fn with_global_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.global_fields.insert(key.into(), value.into());
        self
    }

    pub fn with_service(mut self, name: &str) -> Self {
        self.service_name = Some(name.to_string());
        self
    }

    pub fn with_env_filter<S: Into<String>>(mut self, filter: S) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    fn filter(&self) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
        let directives = self.env_filter.as_deref().unwrap_or(&self.level);
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(directives))
    }
}

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG` wins over the configured filter when set. Fails if a
/// subscriber is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = config.filter()?;

    if config.json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(Layer::new().with_writer(io::stdout).json())
            .try_init()?;
    } else if config.pretty_print {
        tracing_subscriber::registry()
            .with(filter)
            .with(Layer::new().with_writer(io::stdout).pretty())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(Layer::new().with_writer(io::stdout))
            .try_init()?;
    }

    let mut startup = json!({
        "message": "Routing logger initialized",
        "level": config.level,
        "format": if config.json_format { "json" } else { "text" },
    });
    if let Some(name) = &config.service_name {
        startup["service_name"] = json!(name);
    }
    for (key, value) in config.global_fields {
        startup[key] = value;
    }
    tracing::info!(target: "trellis::logging", "{}", startup);

    Ok(())
}
