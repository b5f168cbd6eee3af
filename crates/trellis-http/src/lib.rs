//! # trellis-http
//!
//! Embeddable HTTP routing core.
//!
//! - path templates with `[name]` placeholders or raw `^` expressions,
//!   compiled to anchored, case-insensitive matchers
//! - routes built from functions or from methods of a type manifest, with
//!   shared or per-call instances
//! - a scanner that discovers routes from manifests, honoring filters,
//!   scopes and base paths
//! - an ordered, deduplicated router with before/after hooks
//! - a small dispatch server over a pluggable listener
//!
//! ```rust
//! use trellis_http::{HttpContext, HttpMethod, HttpResult, Router};
//!
//! fn show_user(ctx: &mut HttpContext) -> HttpResult<()> {
//!     let id: u64 = ctx.request.params.get_typed("id")?;
//!     ctx.response.send_text(format!("user {}", id));
//!     Ok(())
//! }
//!
//! let mut router = Router::new();
//! router.register_fn_at(show_user, HttpMethod::GET, "/users/[id]").unwrap();
//!
//! let mut ctx = HttpContext::for_request(HttpMethod::GET, "/users/42");
//! router.route(&mut ctx).unwrap();
//! assert_eq!(ctx.response.body_text(), "user 42");
//! ```

pub mod config;
pub mod context;
pub mod errors;
pub mod logging;
pub mod request;
pub mod response;
pub mod routing;
pub mod scanning;
pub mod server;
pub mod testing;

pub use config::{ConfigError, RouterConfig, ServerConfig};
pub use context::HttpContext;
pub use errors::{HttpError, HttpResult, RoutingError, RoutingResult};
pub use logging::{
    init_logging, LogLevel, LoggingConfig, MemoryLogger, NullLogger, RouteLogger, TracingLogger,
};
pub use request::{HttpMethod, HttpRequest};
pub use response::{HttpResponse, HttpStatus};
pub use routing::{
    Handler, Hook, ParamError, PathParams, PathPattern, PatternError, Route, RouteInfo,
    RouteSource, Router,
};
pub use scanning::{
    Assembly, AssemblyCatalog, MethodDescriptor, MethodKind, MethodSignature, Resource,
    RouteScanner, ScanFilters, TypeDescriptor, TypeKind,
};
pub use server::{dispatch, ChannelClient, ChannelListener, Listener, RestServer};

#[cfg(feature = "derive")]
pub use trellis_http_derive::{delete, get, head, options, patch, post, put, resource, route};

#[doc(hidden)]
pub mod __private {
    pub use ctor::ctor;
}
