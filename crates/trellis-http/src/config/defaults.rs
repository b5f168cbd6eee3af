//! Default configuration values

pub struct RouterDefaults;

impl RouterDefaults {
    pub const SCOPE: &'static str = "";
    pub const CONTINUE_ROUTING_AFTER_RESPONSE_SENT: bool = false;
}

pub struct ServerDefaults;

impl ServerDefaults {
    pub const MAX_CONCURRENT_REQUESTS: usize = 64;
    pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;
}
