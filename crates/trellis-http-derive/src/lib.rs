//! # trellis-http-derive
//!
//! Declarative routing macros for trellis-http.
//!
//! - `#[resource]`: turn an inherent impl block into a route manifest and
//!   register it in the global assembly catalog
//! - `#[route]`, `#[get]`, `#[post]`, ...: routing annotations on the methods
//!   of a `#[resource]` impl block
//!
//! ```rust,ignore
//! use trellis_http::{get, resource, route, HttpContext, HttpMethod, HttpResult};
//!
//! #[derive(Default)]
//! pub struct Users;
//!
//! #[resource(base_path = "/users", scope = "admin")]
//! impl Users {
//!     #[get]
//!     #[get("/all")]
//!     fn list(&self, ctx: &mut HttpContext) -> HttpResult<()> {
//!         ctx.response.send_text("everyone");
//!         Ok(())
//!     }
//!
//!     #[route(DELETE, "/[id]")]
//!     fn remove(ctx: &mut HttpContext) -> HttpResult<()> {
//!         ctx.response.send_text("gone");
//!         Ok(())
//!     }
//! }
//! ```

use proc_macro::TokenStream;

mod resource;
mod routes;
mod signature;

/// Publish the methods of an impl block as a route manifest
///
/// Accepts `base_path = ".."` and `scope = ".."`, or a bare string literal
/// as the base path. Methods taking `&self` run against `Self::default()`,
/// so the type must implement `Default`.
#[proc_macro_attribute]
pub fn resource(args: TokenStream, input: TokenStream) -> TokenStream {
    resource::resource_impl(args.into(), input.into()).into()
}

/// Route a resource method: `#[route]`, `#[route("/path")]` or `#[route(GET, "/path")]`
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
    routes::outside_resource("route", args.into(), input.into()).into()
}

/// GET route on a resource method
#[proc_macro_attribute]
pub fn get(args: TokenStream, input: TokenStream) -> TokenStream {
    routes::outside_resource("get", args.into(), input.into()).into()
}

/// POST route on a resource method
#[proc_macro_attribute]
pub fn post(args: TokenStream, input: TokenStream) -> TokenStream {
    routes::outside_resource("post", args.into(), input.into()).into()
}

/// PUT route on a resource method
#[proc_macro_attribute]
pub fn put(args: TokenStream, input: TokenStream) -> TokenStream {
    routes::outside_resource("put", args.into(), input.into()).into()
}

/// PATCH route on a resource method
#[proc_macro_attribute]
pub fn patch(args: TokenStream, input: TokenStream) -> TokenStream {
    routes::outside_resource("patch", args.into(), input.into()).into()
}

/// DELETE route on a resource method
#[proc_macro_attribute]
pub fn delete(args: TokenStream, input: TokenStream) -> TokenStream {
    routes::outside_resource("delete", args.into(), input.into()).into()
}

/// HEAD route on a resource method
#[proc_macro_attribute]
pub fn head(args: TokenStream, input: TokenStream) -> TokenStream {
    routes::outside_resource("head", args.into(), input.into()).into()
}

/// OPTIONS route on a resource method
#[proc_macro_attribute]
pub fn options(args: TokenStream, input: TokenStream) -> TokenStream {
    routes::outside_resource("options", args.into(), input.into()).into()
}
