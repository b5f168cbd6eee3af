//! `#[resource]` expansion exercised through the router and scanner

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use trellis_http::scanning::{MethodKind, Resource};
use trellis_http::{
    delete, get, post, resource, route, AssemblyCatalog, HttpContext, HttpError, HttpMethod,
    HttpResult, HttpStatus, MemoryLogger, RouteScanner, Router, RoutingError,
};

#[derive(Default)]
struct Books {
    shelf: &'static str,
}

#[resource(base_path = "/books")]
impl Books {
    #[get]
    fn list(&self, ctx: &mut HttpContext) -> HttpResult<()> {
        ctx.response.send_text(format!("books on {}", self.label()));
        Ok(())
    }

    #[get("/[id]")]
    #[delete("/[id]")]
    fn show(&self, ctx: &mut HttpContext) -> HttpResult<()> {
        let id: u32 = ctx.request.params.get_typed("id")?;
        ctx.response
            .send_text(format!("{} book {}", ctx.request.method(), id));
        Ok(())
    }

    #[post]
    fn create(&self, _ctx: &mut HttpContext) -> HttpResult<()> {
        Err(HttpError::conflict("book already exists"))
    }

    fn label(&self) -> &'static str {
        if self.shelf.is_empty() {
            "default shelf"
        } else {
            self.shelf
        }
    }
}

static PINGS: AtomicUsize = AtomicUsize::new(0);

struct Health;

#[resource("/health", scope = "ops")]
impl Health {
    #[route(GET, "/ping")]
    fn ping(ctx: &mut HttpContext) {
        PINGS.fetch_add(1, Ordering::SeqCst);
        ctx.response.send_text("pong");
    }

    #[route(ALL, "/ping")]
    fn audit(ctx: &mut HttpContext) -> HttpResult<()> {
        ctx.response.set_header("x-audited", "yes");
        Ok(())
    }

    #[allow(dead_code)]
    fn new() -> Self {
        Health
    }
}

fn get_request(path: &str) -> HttpContext {
    HttpContext::for_request(HttpMethod::GET, path)
}

#[test]
fn test_descriptor_lists_methods_in_declaration_order() {
    let descriptor = Books::descriptor();
    assert!(descriptor.name().ends_with("Books"));
    assert_eq!(descriptor.resource_attribute().unwrap().base_path, "/books");

    let names: Vec<&str> = descriptor.methods().iter().map(|m| m.name()).collect();
    assert_eq!(names, vec!["list", "show", "create", "label"]);

    let show = descriptor.find_method("show").unwrap();
    assert_eq!(show.routes().len(), 2);
    assert_eq!(show.routes()[1].method, HttpMethod::DELETE);
    assert!(show.needs_instance());

    let label = descriptor.find_method("label").unwrap();
    assert!(!label.has_routes());
    assert!(label.invoker().is_none());
}

#[test]
fn test_constructor_is_recorded_but_never_routed() {
    let descriptor = Health::descriptor();
    let constructor = descriptor.find_method("new").unwrap();
    assert_eq!(constructor.kind(), MethodKind::Constructor);

    let mut router = Router::new();
    router.register_resource::<Health>().unwrap();
    assert_eq!(router.len(), 2);
    assert!(router
        .route_infos()
        .iter()
        .all(|info| !info.name.ends_with(".new")));
}

#[test]
fn test_routes_dispatch_to_fresh_instances() {
    let mut router = Router::new();
    router.register_resource::<Books>().unwrap();

    let paths: Vec<String> = router.route_infos().into_iter().map(|i| i.path).collect();
    assert_eq!(paths, vec!["/books", "/books/[id]", "/books/[id]", "/books"]);

    let mut listing = get_request("/books");
    router.route(&mut listing).unwrap();
    assert_eq!(listing.response.body_text(), "books on default shelf");

    let mut removal = HttpContext::for_request(HttpMethod::DELETE, "/BOOKS/7");
    router.route(&mut removal).unwrap();
    assert_eq!(removal.response.body_text(), "DELETE book 7");
}

#[test]
fn test_handler_errors_surface_from_routing() {
    let mut router = Router::new();
    router.register_resource::<Books>().unwrap();

    let mut create = HttpContext::for_request(HttpMethod::POST, "/books");
    match router.route(&mut create) {
        Err(RoutingError::Handler(error)) => assert_eq!(error.status(), HttpStatus::CONFLICT),
        other => panic!("expected a handler error, got {:?}", other),
    }

    let mut bad_id = get_request("/books/abc");
    assert!(router.route(&mut bad_id).is_err());
}

#[test]
fn test_shared_instance_binding() {
    let show = Books::descriptor().find_method("list").cloned().unwrap();
    let shelf = Arc::new(Books { shelf: "top shelf" });

    let mut router = Router::new();
    router
        .register_bound_method(show, shelf, HttpMethod::GET, "/shelf")
        .unwrap();

    let mut context = get_request("/shelf");
    router.route(&mut context).unwrap();
    assert_eq!(context.response.body_text(), "books on top shelf");
}

#[test]
fn test_unit_handlers_and_wildcard_method_routes() {
    let mut router = Router::new().continue_routing_after_response_sent(true);
    router.register_resource::<Health>().unwrap();

    let before = PINGS.load(Ordering::SeqCst);
    let mut context = get_request("/health/ping");
    router.route(&mut context).unwrap();

    assert!(PINGS.load(Ordering::SeqCst) > before);
    assert_eq!(context.response.body_text(), "pong");
    assert_eq!(context.response.header("x-audited"), Some("yes"));
}

#[test]
fn test_resources_register_in_global_catalog() {
    let assembly = AssemblyCatalog::global()
        .find(env!("CARGO_PKG_NAME"))
        .expect("resources register under the package name");
    let names: Vec<&str> = assembly.types().iter().map(|t| t.short_name()).collect();
    assert!(names.contains(&"Books"));
    assert!(names.contains(&"Health"));
}

#[test]
fn test_scanner_honors_scope_from_macro() {
    let assembly = AssemblyCatalog::global().find(env!("CARGO_PKG_NAME")).unwrap();
    let logger = Arc::new(MemoryLogger::new());

    let scanner = RouteScanner::new()
        .with_scope("web")
        .with_logger(logger.clone());
    let routes = scanner.scan_assembly(&assembly, "/api").unwrap();

    assert!(routes.iter().all(|route| route.path_info().starts_with("/api/books")));
    assert!(logger.contains("due to scoping differences"));

    let ops = RouteScanner::new().with_scope("ops");
    let paths: Vec<String> = ops
        .scan_assembly(&assembly, "")
        .unwrap()
        .iter()
        .map(|route| route.path_info().to_string())
        .collect();
    assert!(paths.contains(&"/health/ping".to_string()));
}
