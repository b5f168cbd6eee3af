//! Route table and dispatch
//!
//! The router keeps routes in registration order and skips any route equal
//! to one already present. Registration takes `&mut self` and happens during
//! setup; dispatch takes `&self`, so a built router can be shared behind an
//! `Arc` and used by many requests at once without locking.

use super::{Hook, Route, RouteInfo};
use crate::config::RouterConfig;
use crate::context::HttpContext;
use crate::errors::{HttpResult, RoutingError, RoutingResult};
use crate::logging::{NullLogger, RouteLogger};
use crate::request::HttpMethod;
use crate::scanning::{
    Assembly, AssemblyCatalog, MethodDescriptor, Resource, RouteScanner, ScanFilters,
    TypeDescriptor,
};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Anything that can hand over a list of routes
///
/// Implemented by [`Router`]; lets one router import another.
pub trait RouteSource: Send + Sync {
    fn routes(&self) -> Vec<Arc<Route>>;
}

/// Ordered route table with before/after hooks
pub struct Router {
    table: Vec<Arc<Route>>,
    before: Option<Hook>,
    after: Option<Hook>,
    continue_after_response: bool,
    scanner: RouteScanner,
    exclusions: ScanFilters,
    logger: Arc<dyn RouteLogger>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            table: Vec::new(),
            before: None,
            after: None,
            continue_after_response: false,
            scanner: RouteScanner::new(),
            exclusions: ScanFilters::new(),
            logger: Arc::new(NullLogger),
        }
    }

    pub fn from_config(config: &RouterConfig) -> Self {
        Self::new()
            .with_scope(config.scope.clone())
            .continue_routing_after_response_sent(config.continue_routing_after_response_sent)
    }

    /// Scope handed to the scanner
    pub fn with_scope<S: Into<String>>(mut self, scope: S) -> Self {
        self.scanner.set_scope(scope);
        self
    }

    pub fn scope(&self) -> &str {
        self.scanner.scope()
    }

    /// Logger used by the router and its scanner
    pub fn with_logger(mut self, logger: Arc<dyn RouteLogger>) -> Self {
        self.scanner.set_logger(Arc::clone(&logger));
        self.logger = logger;
        self
    }

    /// Catalog walked by [`scan_assemblies`](Self::scan_assemblies)
    pub fn with_catalog(mut self, catalog: Arc<AssemblyCatalog>) -> Self {
        self.scanner = self.scanner.with_catalog(catalog);
        self
    }

    /// Run `hook` once before the first matched route
    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut HttpContext) -> HttpResult<()> + Send + Sync + 'static,
    {
        self.before = Some(Arc::new(hook));
        self
    }

    /// Run `hook` once after the matched routes
    pub fn after<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut HttpContext) -> HttpResult<()> + Send + Sync + 'static,
    {
        self.after = Some(Arc::new(hook));
        self
    }

    pub fn continue_routing_after_response_sent(mut self, enabled: bool) -> Self {
        self.continue_after_response = enabled;
        self
    }

    pub fn continues_after_response_sent(&self) -> bool {
        self.continue_after_response
    }

    pub fn scanner(&self) -> &RouteScanner {
        &self.scanner
    }

    pub fn scanner_mut(&mut self) -> &mut RouteScanner {
        &mut self.scanner
    }

    pub fn exclude_type<T: ?Sized + 'static>(&mut self) -> &mut Self {
        self.exclusions.exclude_type::<T>();
        self
    }

    pub fn exclude_type_named<N: Into<String>>(&mut self, name: N) -> &mut Self {
        self.exclusions.exclude_type_named(name);
        self
    }

    pub fn exclude_namespace<N: Into<String>>(&mut self, namespace: N) -> &mut Self {
        self.exclusions.exclude_namespace(namespace);
        self
    }

    /// Add a route unless an equal one is already registered
    pub fn register(&mut self, route: Route) -> &mut Self {
        self.add_to_routing_table(Arc::new(route));
        self
    }

    /// Route a function for every method and path
    pub fn register_fn<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&mut HttpContext) -> HttpResult<()> + Send + Sync + 'static,
    {
        self.register(Route::new(handler))
    }

    pub fn register_fn_at<F>(
        &mut self,
        handler: F,
        http_method: HttpMethod,
        path_info: &str,
    ) -> RoutingResult<&mut Self>
    where
        F: Fn(&mut HttpContext) -> HttpResult<()> + Send + Sync + 'static,
    {
        let route = Route::with(handler, http_method, path_info)?;
        Ok(self.register(route))
    }

    /// Route a manifest method for every method and path
    pub fn register_method(&mut self, method: Arc<MethodDescriptor>) -> RoutingResult<&mut Self> {
        self.register_method_at(method, HttpMethod::ALL, "")
    }

    pub fn register_method_at(
        &mut self,
        method: Arc<MethodDescriptor>,
        http_method: HttpMethod,
        path_info: &str,
    ) -> RoutingResult<&mut Self> {
        let route = Route::from_method(method, http_method, path_info)?;
        Ok(self.register(route))
    }

    /// Route a manifest method against a shared instance
    pub fn register_bound_method<T>(
        &mut self,
        method: Arc<MethodDescriptor>,
        instance: Arc<T>,
        http_method: HttpMethod,
        path_info: &str,
    ) -> RoutingResult<&mut Self>
    where
        T: Any + Send + Sync,
    {
        let route = Route::from_bound_method(method, instance, http_method, path_info)?;
        Ok(self.register(route))
    }

    /// Scan one type and register its routes
    ///
    /// Types excluded on this router are skipped.
    pub fn register_type(&mut self, descriptor: &TypeDescriptor) -> RoutingResult<&mut Self> {
        if self.exclusions.is_excluded_type(descriptor) {
            self.logger.info(&format!(
                "Excluding type {} due to exclusion rules",
                descriptor.name()
            ));
            return Ok(self);
        }
        let routes = self.scanner.scan_type(descriptor, "")?;
        Ok(self.register_all(routes))
    }

    pub fn register_resource<T: Resource>(&mut self) -> RoutingResult<&mut Self> {
        self.register_type(&T::descriptor())
    }

    /// Scan one assembly with this router's exclusions and register the result
    pub fn register_assembly(&mut self, assembly: &Assembly) -> RoutingResult<&mut Self> {
        let routes = self
            .scanner
            .scan_assembly_with(assembly, "", Some(&self.exclusions))?;
        Ok(self.register_all(routes))
    }

    /// Scan every assembly in the catalog and register the result
    pub fn scan_assemblies(&mut self) -> RoutingResult<&mut Self> {
        let routes = self.scanner.scan()?;
        Ok(self.register_all(routes))
    }

    /// Copy the routes of another source into this table
    pub fn import(&mut self, source: &dyn RouteSource) -> &mut Self {
        for route in source.routes() {
            self.add_to_routing_table(route);
        }
        self
    }

    pub fn import_from<R: RouteSource + Default>(&mut self) -> &mut Self {
        self.import(&R::default())
    }

    /// Import the router exposed by a described type
    ///
    /// The type must be a concrete class with a router factory.
    pub fn import_descriptor(&mut self, descriptor: &TypeDescriptor) -> RoutingResult<&mut Self> {
        if !descriptor.is_class() {
            return Err(RoutingError::argument_invalid(format!(
                "{} is not a class",
                descriptor.name()
            )));
        }
        if descriptor.is_abstract() {
            return Err(RoutingError::argument_invalid(format!(
                "{} is abstract",
                descriptor.name()
            )));
        }
        let Some(factory) = descriptor.router_factory() else {
            return Err(RoutingError::argument_invalid(format!(
                "{} does not expose a router",
                descriptor.name()
            )));
        };

        let source = factory();
        Ok(self.import(source.as_ref()))
    }

    fn register_all(&mut self, routes: Vec<Route>) -> &mut Self {
        for route in routes {
            self.add_to_routing_table(Arc::new(route));
        }
        self
    }

    fn add_to_routing_table(&mut self, route: Arc<Route>) {
        if self.table.iter().any(|existing| **existing == *route) {
            tracing::trace!(target: "trellis::router", route = %route, "Skipping duplicate route");
            return;
        }
        tracing::trace!(target: "trellis::router", route = %route, "Registered route");
        self.table.push(route);
    }

    pub fn routing_table(&self) -> &[Arc<Route>] {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn route_infos(&self) -> Vec<RouteInfo> {
        self.table.iter().map(|route| RouteInfo::from(route.as_ref())).collect()
    }

    /// Matching routes, in table order
    pub fn route_for(&self, context: &HttpContext) -> Vec<Arc<Route>> {
        self.table
            .iter()
            .filter(|route| route.matches(context))
            .cloned()
            .collect()
    }

    /// Dispatch a request through every matching route
    pub fn route(&self, context: &mut HttpContext) -> RoutingResult<bool> {
        let routing = self.route_for(context);
        self.route_with(context, &routing)
    }

    /// Dispatch a request through an explicit route list
    ///
    /// The before hook runs once up front and the after hook once at the
    /// end. Once a route has sent a response the remaining ones are skipped
    /// unless continuing was enabled. Handler errors are returned
    /// immediately, without running the after hook.
    pub fn route_with(
        &self,
        context: &mut HttpContext,
        routing: &[Arc<Route>],
    ) -> RoutingResult<bool> {
        if routing.is_empty() {
            return Err(RoutingError::route_not_found(
                context.request.method(),
                context.request.path_info(),
            ));
        }

        let span = tracing::debug_span!(
            target: "trellis::router",
            "dispatch",
            request_id = %context.id(),
            method = %context.request.method(),
            path = %context.request.path_info(),
        );
        let _entered = span.enter();
        tracing::debug!(target: "trellis::router", matched = routing.len(), "Routing request");

        if let Some(before) = &self.before {
            before(context)?;
        }

        for route in routing {
            if context.was_responded_to() && !self.continue_after_response {
                tracing::debug!(target: "trellis::router", "Response sent, skipping remaining routes");
                break;
            }
            tracing::trace!(target: "trellis::router", route = %route, "Invoking route");
            route.invoke(context)?;
        }

        if let Some(after) = &self.after {
            after(context)?;
        }

        Ok(true)
    }
}

impl RouteSource for Router {
    fn routes(&self) -> Vec<Arc<Route>> {
        self.table.clone()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.table)
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .field("continue_after_response", &self.continue_after_response)
            .field("scanner", &self.scanner)
            .finish()
    }
}
