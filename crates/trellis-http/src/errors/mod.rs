pub mod http_error;
pub mod routing_error;

pub use http_error::*;
pub use routing_error::*;
