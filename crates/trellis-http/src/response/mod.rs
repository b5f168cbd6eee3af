//! Response-side types written by route handlers

pub mod response;
pub mod status;

pub use response::HttpResponse;
pub use status::HttpStatus;
