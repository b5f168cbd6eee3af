//! A single routable handler
//!
//! A [`Route`] pairs an HTTP method and a compiled [`PathPattern`] with
//! something to run: either a plain function or a method taken from a type
//! manifest. Method routes either share one instance across every call or
//! build a private instance per call, which is dropped once the call returns.

use super::{PathPattern, RoutingResult};
use crate::context::HttpContext;
use crate::errors::{HttpError, HttpResult, RoutingError};
use crate::request::HttpMethod;
use crate::scanning::{Instance, MethodDescriptor};
use once_cell::sync::Lazy;
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Handler run by function routes
pub type Handler = Arc<dyn Fn(&mut HttpContext) -> HttpResult<()> + Send + Sync>;

/// Hook run by the router around a dispatch
pub type Hook = Handler;

static MATCH_ANY: Lazy<PathPattern> =
    Lazy::new(|| PathPattern::compile("").expect("empty template always compiles"));

/// What makes two routes "the same handler"
///
/// Stateless functions are known by their type. Anything carrying state is
/// known by the allocation holding its body, so two closures built by the
/// same factory stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum HandlerIdentity {
    Function(TypeId),
    Closure(usize),
    Method {
        declaring_type: String,
        method: String,
    },
    FreeMethod {
        method: String,
        body: usize,
    },
}

impl HandlerIdentity {
    fn of_function<F: 'static>(handler: &Handler) -> Self {
        if std::mem::size_of::<F>() == 0 {
            Self::Function(TypeId::of::<F>())
        } else {
            Self::Closure(address_of(handler))
        }
    }

    fn of_method(method: &MethodDescriptor) -> Self {
        match method.invoker() {
            Some(invoker) if method.declaring_type().is_empty() => Self::FreeMethod {
                method: method.name().to_string(),
                body: address_of(invoker),
            },
            _ => Self::Method {
                declaring_type: method.declaring_type().to_string(),
                method: method.name().to_string(),
            },
        }
    }
}

fn address_of<T: ?Sized>(body: &Arc<T>) -> usize {
    Arc::as_ptr(body) as *const () as usize
}

enum RouteHandler {
    Function(Handler),
    Method {
        descriptor: Arc<MethodDescriptor>,
        shared: Option<Arc<Instance>>,
    },
}

/// An HTTP method, a path pattern and the handler they lead to
pub struct Route {
    name: String,
    http_method: HttpMethod,
    pattern: PathPattern,
    enabled: AtomicBool,
    handler: RouteHandler,
    identity: HandlerIdentity,
}

impl Route {
    /// Route a function for every method and path
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&mut HttpContext) -> HttpResult<()> + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        Self {
            name: function_name::<F>(),
            http_method: HttpMethod::ALL,
            pattern: MATCH_ANY.clone(),
            enabled: AtomicBool::new(true),
            identity: HandlerIdentity::of_function::<F>(&handler),
            handler: RouteHandler::Function(handler),
        }
    }

    /// Route a function for one method and path template
    pub fn with<F>(handler: F, http_method: HttpMethod, path_info: &str) -> RoutingResult<Self>
    where
        F: Fn(&mut HttpContext) -> HttpResult<()> + Send + Sync + 'static,
    {
        let pattern = PathPattern::compile(path_info)?;
        Ok(Self {
            http_method,
            pattern,
            ..Self::new(handler)
        })
    }

    /// Route a manifest method
    ///
    /// Instance methods run against a fresh instance created for each call.
    pub fn from_method(
        method: Arc<MethodDescriptor>,
        http_method: HttpMethod,
        path_info: &str,
    ) -> RoutingResult<Self> {
        Self::build_method(method, None, http_method, path_info)
    }

    /// Route a manifest method against one shared instance
    ///
    /// The instance is used by every call, concurrently if requests overlap;
    /// any interior mutability in `T` is the caller's to synchronize.
    pub fn from_bound_method<T>(
        method: Arc<MethodDescriptor>,
        instance: Arc<T>,
        http_method: HttpMethod,
        path_info: &str,
    ) -> RoutingResult<Self>
    where
        T: Any + Send + Sync,
    {
        if method.instance_type() != Some(TypeId::of::<T>()) {
            return Err(RoutingError::argument_invalid(format!(
                "instance of {} cannot be bound to {}",
                type_name::<T>(),
                method.qualified_name()
            )));
        }
        let shared: Arc<Instance> = instance;
        Self::build_method(method, Some(shared), http_method, path_info)
    }

    fn build_method(
        method: Arc<MethodDescriptor>,
        shared: Option<Arc<Instance>>,
        http_method: HttpMethod,
        path_info: &str,
    ) -> RoutingResult<Self> {
        let name = method.qualified_name();

        if !method.kind().is_eligible() {
            return Err(RoutingError::invalid_signature(
                name,
                format!("{:?} members cannot handle routes", method.kind()),
            ));
        }
        method
            .signature()
            .validate()
            .map_err(|reason| RoutingError::invalid_signature(name.clone(), reason))?;

        if method.invoker().is_none() {
            return Err(RoutingError::argument_null(format!("{} (method body)", name)));
        }
        if method.needs_instance() && shared.is_none() && method.instance_factory().is_none() {
            return Err(RoutingError::argument_invalid(format!(
                "{} needs an instance but none can be created",
                name
            )));
        }

        let pattern = PathPattern::compile(path_info)?;
        let identity = HandlerIdentity::of_method(&method);

        Ok(Self {
            name,
            http_method,
            pattern,
            enabled: AtomicBool::new(true),
            handler: RouteHandler::Method {
                descriptor: method,
                shared,
            },
            identity,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn http_method(&self) -> HttpMethod {
        self.http_method
    }

    /// The template the route was declared with
    pub fn path_info(&self) -> &str {
        self.pattern.template()
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Release);
    }

    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Release);
    }

    /// `"{method} {path} > {name}"`
    pub fn description(&self) -> String {
        format!("{} {} > {}", self.http_method, self.path_info(), self.name)
    }

    /// True when the route is enabled and accepts the request's method and path
    pub fn matches(&self, context: &HttpContext) -> bool {
        self.is_enabled()
            && (self.http_method.is_wildcard() || self.http_method == context.request.method())
            && self.pattern.is_match(context.request.path_info())
    }

    /// Bind path parameters and run the handler
    ///
    /// A disabled route leaves the context untouched. Handler errors are
    /// returned as-is.
    pub fn invoke(&self, context: &mut HttpContext) -> HttpResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        if let Some(params) = self.pattern.captures(context.request.path_info()) {
            for (name, value) in params {
                context.request.params.insert(name, value);
            }
        }

        match &self.handler {
            RouteHandler::Function(handler) => handler(context),
            RouteHandler::Method { descriptor, shared } => {
                let Some(invoker) = descriptor.invoker() else {
                    return Err(HttpError::internal(format!(
                        "{} has no method body",
                        self.name
                    )));
                };

                match shared {
                    Some(instance) => invoker(Some(instance.as_ref()), context),
                    None => match descriptor.instance_factory() {
                        // The private instance is dropped when this arm ends, error or not.
                        Some(factory) if descriptor.needs_instance() => {
                            let instance = factory();
                            invoker(Some(instance.as_ref()), context)
                        }
                        _ => invoker(None, context),
                    },
                }
            }
        }
    }
}

impl PartialEq for Route {
    /// Same handler and wildcard-equivalent methods; the path is ignored
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity && self.http_method.is_equivalent_to(&other.http_method)
    }
}

impl Hash for Route {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("http_method", &self.http_method)
            .field("path_info", &self.path_info())
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

fn function_name<F: ?Sized>() -> String {
    type_name::<F>().replace("{{closure}}", "closure")
}
