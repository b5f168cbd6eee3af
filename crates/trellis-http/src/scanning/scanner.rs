//! Route discovery over type manifests
//!
//! The scanner turns assemblies, types and methods into an ordered route
//! list. Order is declaration order all the way down, which the router later
//! uses as dispatch priority.

use super::paths;
use super::{Assembly, AssemblyCatalog, MethodDescriptor, ScanFilters, TypeDescriptor};
use crate::errors::{RoutingError, RoutingResult};
use crate::logging::{NullLogger, RouteLogger};
use crate::routing::Route;
use std::sync::Arc;

/// Builds routes from manifests, honoring filters, scope and base paths
#[derive(Clone)]
pub struct RouteScanner {
    filters: ScanFilters,
    scope: String,
    logger: Arc<dyn RouteLogger>,
    catalog: Arc<AssemblyCatalog>,
}

impl Default for RouteScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteScanner {
    /// A scanner over the global catalog with no filters, no scope and a silent logger
    pub fn new() -> Self {
        Self {
            filters: ScanFilters::new(),
            scope: String::new(),
            logger: Arc::new(NullLogger),
            catalog: AssemblyCatalog::global(),
        }
    }

    pub fn with_scope<S: Into<String>>(mut self, scope: S) -> Self {
        self.set_scope(scope);
        self
    }

    pub fn set_scope<S: Into<String>>(&mut self, scope: S) {
        self.scope = scope.into();
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn with_logger(mut self, logger: Arc<dyn RouteLogger>) -> Self {
        self.set_logger(logger);
        self
    }

    pub fn set_logger(&mut self, logger: Arc<dyn RouteLogger>) {
        self.logger = logger;
    }

    /// Scan this catalog instead of the global one
    pub fn with_catalog(mut self, catalog: Arc<AssemblyCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn catalog(&self) -> &Arc<AssemblyCatalog> {
        &self.catalog
    }

    pub fn filters(&self) -> &ScanFilters {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut ScanFilters {
        &mut self.filters
    }

    /// Scan every loaded assembly that passes the assembly filters
    pub fn scan(&self) -> RoutingResult<Vec<Route>> {
        let mut routes = Vec::new();
        for assembly in self.catalog.assemblies() {
            if self.filters.is_excluded_assembly(assembly.name()) {
                continue;
            }
            routes.extend(self.scan_assembly(&assembly, "")?);
        }
        Ok(routes)
    }

    /// Scan the types of one assembly, prefixing every path with `base_url`
    pub fn scan_assembly(&self, assembly: &Assembly, base_url: &str) -> RoutingResult<Vec<Route>> {
        self.scan_assembly_with(assembly, base_url, None)
    }

    /// Like [`scan_assembly`](Self::scan_assembly), also honoring a caller's exclusions
    pub(crate) fn scan_assembly_with(
        &self,
        assembly: &Assembly,
        base_url: &str,
        extra: Option<&ScanFilters>,
    ) -> RoutingResult<Vec<Route>> {
        let mut routes = Vec::new();
        if self.filters.is_excluded_assembly(assembly.name()) {
            return Ok(routes);
        }

        self.logger
            .info(&format!("Generating routes for assembly {}", assembly.name()));

        for descriptor in assembly.types() {
            let excluded = self.filters.is_excluded_type(descriptor)
                || extra.is_some_and(|filters| filters.is_excluded_type(descriptor));
            if excluded {
                self.logger.info(&format!(
                    "Excluding type {} due to exclusion rules",
                    descriptor.name()
                ));
                continue;
            }

            if !self.is_in_scope(descriptor) {
                self.logger.info(&format!(
                    "Excluding type {} due to scoping differences",
                    descriptor.name()
                ));
                continue;
            }

            routes.extend(self.scan_type(descriptor, base_url)?);
        }

        Ok(routes)
    }

    /// Scan the methods of one type
    ///
    /// Abstract and non-class types yield nothing. Methods that cannot be
    /// routes or carry no annotation are skipped; an annotated method with a
    /// bad signature is an error.
    pub fn scan_type(&self, descriptor: &TypeDescriptor, base_path: &str) -> RoutingResult<Vec<Route>> {
        if !descriptor.is_class() || descriptor.is_abstract() {
            return Ok(Vec::new());
        }

        self.logger
            .info(&format!("Generating routes from type {}", descriptor.name()));

        let base_path = self.generate_base_path(base_path, descriptor);
        let mut routes = Vec::new();
        for method in descriptor.methods() {
            if !method.kind().is_eligible() || !method.has_routes() {
                continue;
            }
            routes.extend(self.routes_for(method, &base_path)?);
        }
        Ok(routes)
    }

    /// Scan a single method that was asked for explicitly
    ///
    /// Unlike type scanning, a method that cannot handle requests is an
    /// error here even when it carries no annotation.
    pub fn scan_method(
        &self,
        method: &Arc<MethodDescriptor>,
        base_path: &str,
    ) -> RoutingResult<Vec<Route>> {
        if !method.kind().is_eligible() {
            return Err(RoutingError::invalid_signature(
                method.qualified_name(),
                format!("{:?} members cannot handle routes", method.kind()),
            ));
        }
        method
            .signature()
            .validate()
            .map_err(|reason| RoutingError::invalid_signature(method.qualified_name(), reason))?;

        self.routes_for(method, base_path)
    }

    fn routes_for(&self, method: &Arc<MethodDescriptor>, base_path: &str) -> RoutingResult<Vec<Route>> {
        let mut routes = Vec::with_capacity(method.routes().len());
        for attribute in method.routes() {
            let path_info = self.generate_path_info(&attribute.path_info, base_path);
            let route = Route::from_method(Arc::clone(method), attribute.method, &path_info)?;
            self.logger
                .info(&format!("Generated route {}", route.description()));
            routes.push(route);
        }
        Ok(routes)
    }

    /// True when the type declares no scope, the scanner has none, or they match
    pub fn is_in_scope(&self, descriptor: &TypeDescriptor) -> bool {
        let declared = descriptor
            .resource_attribute()
            .map(|resource| resource.scope.as_str())
            .unwrap_or_default();

        declared.is_empty() || self.scope.is_empty() || declared == self.scope
    }

    pub fn generate_path_info(&self, path_info: &str, base_path: &str) -> String {
        paths::generate_path_info(path_info, base_path)
    }

    pub fn generate_base_path(&self, supplied: &str, descriptor: &TypeDescriptor) -> String {
        paths::generate_base_path(supplied, descriptor)
    }
}

impl std::fmt::Debug for RouteScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteScanner")
            .field("filters", &self.filters)
            .field("scope", &self.scope)
            .field("assemblies", &self.catalog.len())
            .finish()
    }
}
