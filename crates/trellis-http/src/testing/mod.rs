//! Helpers for testing routes and resources
//!
//! ```rust
//! use trellis_http::testing::{ResponseAssertions, TestContext};
//! use trellis_http::{HttpMethod, Router};
//!
//! let mut router = Router::new();
//! router
//!     .register_fn_at(trellis_http::testing::respond_with("hi"), HttpMethod::GET, "/hi")
//!     .unwrap();
//!
//! let mut ctx = TestContext::get("/hi").build();
//! router.route(&mut ctx).unwrap();
//! ctx.response.assert_ok();
//! ctx.response.assert_body("hi");
//! ```

pub mod assertions;
pub mod context;
pub mod fixtures;

pub use assertions::ResponseAssertions;
pub use context::TestContext;
pub use fixtures::*;

pub use crate::logging::MemoryLogger;
