pub mod config;
pub mod logger;

pub use config::{init_logging, LoggingConfig};
pub use logger::{LogEntry, LogLevel, MemoryLogger, NullLogger, RouteLogger, TracingLogger};
