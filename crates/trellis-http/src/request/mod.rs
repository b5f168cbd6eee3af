//! Request-side types consumed by the routing core

pub mod method;
pub mod request;

pub use method::{HttpMethod, InvalidMethod};
pub use request::HttpRequest;
