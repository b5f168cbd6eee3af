//! Ready-made handlers and manifests

use crate::config::RouterConfig;
use crate::context::HttpContext;
use crate::errors::{HttpError, HttpResult};
use crate::request::HttpMethod;
use crate::scanning::{Assembly, MethodDescriptor, TypeDescriptor};

/// Handler that answers with a fixed text body
pub fn respond_with(
    text: &'static str,
) -> impl Fn(&mut HttpContext) -> HttpResult<()> + Send + Sync + 'static {
    move |context: &mut HttpContext| {
        context.response.send_text(text);
        Ok(())
    }
}

/// Handler that answers with the named path parameter
pub fn echo_param(
    name: &'static str,
) -> impl Fn(&mut HttpContext) -> HttpResult<()> + Send + Sync + 'static {
    move |context: &mut HttpContext| {
        let value = context.request.params.get(name).unwrap_or_default().to_string();
        context.response.send_text(value);
        Ok(())
    }
}

/// Handler that always fails with a bad request
pub fn failing_handler(context: &mut HttpContext) -> HttpResult<()> {
    Err(HttpError::bad_request(format!(
        "rejected {}",
        context.request.path_info()
    )))
}

/// A routable type with one GET route per `(method_name, path)` pair
pub fn text_resource(
    type_name: &str,
    base_path: &str,
    routes: &[(&'static str, &str)],
) -> TypeDescriptor {
    routes.iter().fold(
        TypeDescriptor::named(type_name).resource(base_path, ""),
        |descriptor, &(name, path)| {
            descriptor.method(
                MethodDescriptor::function(name, respond_with(name)).route(HttpMethod::GET, path),
            )
        },
    )
}

/// Single-type assembly
pub fn assembly_of(name: &str, descriptor: TypeDescriptor) -> Assembly {
    Assembly::new(name).with_type(descriptor)
}

/// Router settings used across tests
pub fn test_router_config() -> RouterConfig {
    RouterConfig {
        scope: String::new(),
        continue_routing_after_response_sent: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Router;

    #[test]
    fn test_text_resource_routes() {
        let descriptor = text_resource("app::Pages", "/pages", &[("home", "/"), ("about", "/about")]);
        let mut router = Router::from_config(&test_router_config());
        router.register_type(&descriptor).unwrap();

        let paths: Vec<String> = router.route_infos().into_iter().map(|info| info.path).collect();
        assert_eq!(paths, vec!["/pages/", "/pages/about"]);

        let mut context = HttpContext::for_request(HttpMethod::GET, "/pages/about");
        router.route(&mut context).unwrap();
        assert_eq!(context.response.body_text(), "about");
    }

    #[test]
    fn test_failing_handler() {
        let mut context = HttpContext::for_request(HttpMethod::GET, "/x");
        assert!(failing_handler(&mut context).is_err());
    }
}
