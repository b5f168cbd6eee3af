//! Static route manifest
//!
//! The scanner walks these descriptors the way a reflective framework walks
//! loaded types: an [`Assembly`] groups [`TypeDescriptor`]s, which group
//! [`MethodDescriptor`]s carrying their routing annotations. Manifests are
//! written by `#[resource]` or built by hand with the builders below.

use crate::context::HttpContext;
use crate::errors::{HttpError, HttpResult};
use crate::request::HttpMethod;
use crate::routing::RouteSource;
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Type-erased handler owner
pub type Instance = dyn Any + Send + Sync;

/// Type-erased method body: receives the owning instance, if any, and the context
pub type MethodInvoker =
    Arc<dyn Fn(Option<&Instance>, &mut HttpContext) -> HttpResult<()> + Send + Sync>;

/// Creates the private instance a method runs against
pub type InstanceFactory = Arc<dyn Fn() -> Box<Instance> + Send + Sync>;

/// Creates a router exposed by a type for `Router::import_descriptor`
pub type RouterFactory = Arc<dyn Fn() -> Box<dyn RouteSource> + Send + Sync>;

/// Types that publish a route manifest
///
/// Implemented by `#[resource]`; implement by hand for manifest-only types.
pub trait Resource: 'static {
    fn descriptor() -> TypeDescriptor;
}

/// Method-level routing annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAttribute {
    pub method: HttpMethod,
    pub path_info: String,
}

impl RouteAttribute {
    pub fn new<P: Into<String>>(method: HttpMethod, path_info: P) -> Self {
        Self {
            method,
            path_info: path_info.into(),
        }
    }
}

/// Type-level routing annotation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceAttribute {
    pub base_path: String,
    pub scope: String,
}

impl ResourceAttribute {
    pub fn new<B: Into<String>, S: Into<String>>(base_path: B, scope: S) -> Self {
        Self {
            base_path: base_path.into(),
            scope: scope.into(),
        }
    }
}

/// What kind of member a method descriptor describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Concrete method declared on the type itself
    Regular,
    /// Declared without a body
    Abstract,
    Constructor,
    /// Getter, setter or operator
    Accessor,
    /// Provided by another type and not redeclared here
    Inherited,
}

impl MethodKind {
    /// Only regular methods can become routes
    pub fn is_eligible(&self) -> bool {
        matches!(self, MethodKind::Regular)
    }
}

/// How a method receives its owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receiver {
    /// Associated function, no instance
    None,
    /// `&self`
    Shared,
    /// Anything else (`&mut self`, `self`, ...)
    Other(String),
}

/// Shape of a parameter or return type, as far as routing cares
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// `&mut HttpContext`
    Context,
    /// `HttpResult<()>`
    HandlerResult,
    /// `()`
    Unit,
    Other(String),
}

/// Declared signature of a method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub receiver: Receiver,
    pub parameters: Vec<TypeRef>,
    pub returns: TypeRef,
}

impl MethodSignature {
    /// `fn(&self, &mut HttpContext) -> HttpResult<()>`
    pub fn handler() -> Self {
        Self {
            receiver: Receiver::Shared,
            parameters: vec![TypeRef::Context],
            returns: TypeRef::HandlerResult,
        }
    }

    /// `fn(&mut HttpContext) -> HttpResult<()>`
    pub fn static_handler() -> Self {
        Self {
            receiver: Receiver::None,
            ..Self::handler()
        }
    }

    /// Explain why this signature cannot handle requests, if it cannot
    pub fn validate(&self) -> Result<(), String> {
        if let Receiver::Other(receiver) = &self.receiver {
            return Err(format!("receiver `{}` must be `&self` or absent", receiver));
        }
        if !matches!(self.returns, TypeRef::HandlerResult | TypeRef::Unit) {
            return Err(format!(
                "must return HttpResult<()> but returns {}",
                describe(&self.returns)
            ));
        }
        if self.parameters.len() != 1 {
            return Err(format!(
                "must take exactly one &mut HttpContext parameter but takes {}",
                self.parameters.len()
            ));
        }
        if self.parameters[0] != TypeRef::Context {
            return Err(format!(
                "parameter must be &mut HttpContext but is {}",
                describe(&self.parameters[0])
            ));
        }
        Ok(())
    }

    pub fn is_route_handler(&self) -> bool {
        self.validate().is_ok()
    }
}

fn describe(type_ref: &TypeRef) -> &str {
    match type_ref {
        TypeRef::Context => "&mut HttpContext",
        TypeRef::HandlerResult => "HttpResult<()>",
        TypeRef::Unit => "()",
        TypeRef::Other(name) => name,
    }
}

/// A method that may carry route annotations
#[derive(Clone)]
pub struct MethodDescriptor {
    name: String,
    declaring_type: String,
    kind: MethodKind,
    signature: MethodSignature,
    routes: Vec<RouteAttribute>,
    invoker: Option<MethodInvoker>,
    factory: Option<InstanceFactory>,
    instance_type: Option<TypeId>,
}

impl MethodDescriptor {
    /// A `&self` method of `T`; routes built from it run against a fresh `T::default()`
    /// per invocation unless given a shared instance
    pub fn instance<T, F>(name: &str, body: F) -> Self
    where
        T: Default + Send + Sync + 'static,
        F: Fn(&T, &mut HttpContext) -> HttpResult<()> + Send + Sync + 'static,
    {
        let invoker: MethodInvoker = Arc::new(
            move |instance: Option<&Instance>, context: &mut HttpContext| {
            let this = instance
                .and_then(|instance| instance.downcast_ref::<T>())
                .ok_or_else(|| {
                    HttpError::internal(format!(
                        "method requires an instance of {}",
                        type_name::<T>()
                    ))
                })?;
                body(this, context)
            },
        );
        let factory: InstanceFactory = Arc::new(|| Box::new(T::default()) as Box<Instance>);

        Self {
            name: name.to_string(),
            declaring_type: type_name::<T>().to_string(),
            kind: MethodKind::Regular,
            signature: MethodSignature::handler(),
            routes: Vec::new(),
            invoker: Some(invoker),
            factory: Some(factory),
            instance_type: Some(TypeId::of::<T>()),
        }
    }

    /// An associated function taking only the context
    pub fn function<F>(name: &str, body: F) -> Self
    where
        F: Fn(&mut HttpContext) -> HttpResult<()> + Send + Sync + 'static,
    {
        let invoker: MethodInvoker =
            Arc::new(move |_: Option<&Instance>, context: &mut HttpContext| body(context));

        Self {
            name: name.to_string(),
            declaring_type: String::new(),
            kind: MethodKind::Regular,
            signature: MethodSignature::static_handler(),
            routes: Vec::new(),
            invoker: Some(invoker),
            factory: None,
            instance_type: None,
        }
    }

    /// A method known only by its declaration; it has no body to invoke
    pub fn declared(name: &str, signature: MethodSignature) -> Self {
        Self {
            name: name.to_string(),
            declaring_type: String::new(),
            kind: MethodKind::Regular,
            signature,
            routes: Vec::new(),
            invoker: None,
            factory: None,
            instance_type: None,
        }
    }

    pub fn with_kind(mut self, kind: MethodKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_signature(mut self, signature: MethodSignature) -> Self {
        self.signature = signature;
        self
    }

    /// Attach a routing annotation; annotations keep declaration order
    pub fn route<P: Into<String>>(mut self, method: HttpMethod, path_info: P) -> Self {
        self.routes.push(RouteAttribute::new(method, path_info));
        self
    }

    pub fn declared_on<T: Into<String>>(mut self, type_name: T) -> Self {
        self.declaring_type = type_name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    /// `Type.method`, or the bare name for free functions
    pub fn qualified_name(&self) -> String {
        if self.declaring_type.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.declaring_type, self.name)
        }
    }

    pub fn kind(&self) -> MethodKind {
        self.kind
    }

    pub fn signature(&self) -> &MethodSignature {
        &self.signature
    }

    pub fn routes(&self) -> &[RouteAttribute] {
        &self.routes
    }

    pub fn has_routes(&self) -> bool {
        !self.routes.is_empty()
    }

    pub fn invoker(&self) -> Option<&MethodInvoker> {
        self.invoker.as_ref()
    }

    pub fn instance_factory(&self) -> Option<&InstanceFactory> {
        self.factory.as_ref()
    }

    /// Concrete type a shared instance must have, when the method needs one
    pub fn instance_type(&self) -> Option<TypeId> {
        self.instance_type
    }

    pub fn needs_instance(&self) -> bool {
        self.signature.receiver == Receiver::Shared
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.qualified_name())
            .field("kind", &self.kind)
            .field("signature", &self.signature)
            .field("routes", &self.routes)
            .field("invocable", &self.invoker.is_some())
            .finish()
    }
}

/// Category of a described type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    AbstractClass,
    Interface,
    Value,
}

/// A type that may own routed methods
#[derive(Clone)]
pub struct TypeDescriptor {
    name: String,
    namespace: String,
    kind: TypeKind,
    resource: Option<ResourceAttribute>,
    methods: Vec<Arc<MethodDescriptor>>,
    router_factory: Option<RouterFactory>,
}

impl TypeDescriptor {
    /// Describe the Rust type `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::named(type_name::<T>())
    }

    /// Describe a type by its qualified name (`module::path::Type`)
    pub fn named<N: Into<String>>(name: N) -> Self {
        let name = name.into();
        let namespace = name
            .rsplit_once("::")
            .map(|(namespace, _)| namespace.to_string())
            .unwrap_or_default();

        Self {
            name,
            namespace,
            kind: TypeKind::Class,
            resource: None,
            methods: Vec::new(),
            router_factory: None,
        }
    }

    pub fn with_kind(mut self, kind: TypeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_namespace<N: Into<String>>(mut self, namespace: N) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Attach the type-level base path and scope
    pub fn resource<B: Into<String>, S: Into<String>>(mut self, base_path: B, scope: S) -> Self {
        self.resource = Some(ResourceAttribute::new(base_path, scope));
        self
    }

    /// Add a method declared on this type, in declaration order
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        let method = if method.declaring_type.is_empty() {
            method.declared_on(self.name.clone())
        } else {
            method
        };
        self.methods.push(Arc::new(method));
        self
    }

    /// Mark this type as exposing a router of type `R`
    pub fn router<R: RouteSource + Default + 'static>(mut self) -> Self {
        self.router_factory = Some(Arc::new(|| Box::new(R::default()) as Box<dyn RouteSource>));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last path segment of the type name
    pub fn short_name(&self) -> &str {
        self.name
            .rsplit_once("::")
            .map(|(_, short)| short)
            .unwrap_or(&self.name)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, TypeKind::Class | TypeKind::AbstractClass)
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self.kind, TypeKind::AbstractClass | TypeKind::Interface)
    }

    pub fn resource_attribute(&self) -> Option<&ResourceAttribute> {
        self.resource.as_ref()
    }

    pub fn methods(&self) -> &[Arc<MethodDescriptor>] {
        &self.methods
    }

    pub fn find_method(&self, name: &str) -> Option<&Arc<MethodDescriptor>> {
        self.methods.iter().find(|method| method.name == name)
    }

    pub fn router_factory(&self) -> Option<&RouterFactory> {
        self.router_factory.as_ref()
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("resource", &self.resource)
            .field("methods", &self.methods)
            .field("router", &self.router_factory.is_some())
            .finish()
    }
}

/// A named group of described types, the unit the scanner loads
#[derive(Debug, Clone)]
pub struct Assembly {
    name: String,
    types: Vec<TypeDescriptor>,
}

impl Assembly {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
        }
    }

    pub fn with_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.add_type(descriptor);
        self
    }

    /// Add the manifest of a resource type
    pub fn with_resource<T: Resource>(self) -> Self {
        self.with_type(T::descriptor())
    }

    /// Add a type, replacing an earlier descriptor with the same name
    pub fn add_type(&mut self, descriptor: TypeDescriptor) {
        match self.types.iter_mut().find(|t| t.name == descriptor.name) {
            Some(existing) => *existing = descriptor,
            None => self.types.push(descriptor),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Greeter;

    impl Greeter {
        fn hello(&self, context: &mut HttpContext) -> HttpResult<()> {
            context.response.send_text("hello");
            Ok(())
        }
    }

    #[test]
    fn test_handler_signatures_validate() {
        assert!(MethodSignature::handler().is_route_handler());
        assert!(MethodSignature::static_handler().is_route_handler());

        let unit = MethodSignature {
            returns: TypeRef::Unit,
            ..MethodSignature::handler()
        };
        assert!(unit.is_route_handler());
    }

    #[test]
    fn test_invalid_signatures_explain_themselves() {
        let wrong_return = MethodSignature {
            returns: TypeRef::Other("String".into()),
            ..MethodSignature::handler()
        };
        assert!(wrong_return.validate().unwrap_err().contains("String"));

        let two_params = MethodSignature {
            parameters: vec![TypeRef::Context, TypeRef::Other("u32".into())],
            ..MethodSignature::handler()
        };
        assert!(two_params.validate().unwrap_err().contains("exactly one"));

        let mutable = MethodSignature {
            receiver: Receiver::Other("&mut self".into()),
            ..MethodSignature::handler()
        };
        assert!(mutable.validate().unwrap_err().contains("&mut self"));
    }

    #[test]
    fn test_instance_method_descriptor() {
        let method = MethodDescriptor::instance::<Greeter, _>("hello", Greeter::hello)
            .route(HttpMethod::GET, "/hello")
            .route(HttpMethod::HEAD, "/hello");

        assert!(method.declaring_type().ends_with("Greeter"));
        assert!(method.qualified_name().ends_with("Greeter.hello"));
        assert!(method.needs_instance());
        assert_eq!(method.routes().len(), 2);
        assert_eq!(method.routes()[1].method, HttpMethod::HEAD);
        assert_eq!(method.instance_type(), Some(TypeId::of::<Greeter>()));
    }

    #[test]
    fn test_invoker_rejects_wrong_instance() {
        let method = MethodDescriptor::instance::<Greeter, _>("hello", Greeter::hello);
        let invoker = method.invoker().unwrap();
        let mut context = HttpContext::for_request(HttpMethod::GET, "/hello");

        let wrong: Box<Instance> = Box::new(5u8);
        assert!(invoker(Some(wrong.as_ref()), &mut context).is_err());
        assert!(invoker(None, &mut context).is_err());

        let factory = method.instance_factory().unwrap();
        let instance = factory();
        invoker(Some(instance.as_ref()), &mut context).unwrap();
        assert_eq!(context.response.body_text(), "hello");
    }

    #[test]
    fn test_type_descriptor_names() {
        let descriptor = TypeDescriptor::named("shop::api::OrdersResource");
        assert_eq!(descriptor.namespace(), "shop::api");
        assert_eq!(descriptor.short_name(), "OrdersResource");

        let bare = TypeDescriptor::named("Orders");
        assert_eq!(bare.namespace(), "");
        assert_eq!(bare.short_name(), "Orders");
    }

    #[test]
    fn test_methods_inherit_declaring_type() {
        let descriptor = TypeDescriptor::named("api::Health")
            .method(MethodDescriptor::function("ping", |_| Ok(())));
        assert_eq!(descriptor.methods()[0].qualified_name(), "api::Health.ping");
        assert!(descriptor.find_method("ping").is_some());
        assert!(descriptor.find_method("pong").is_none());
    }

    #[test]
    fn test_assembly_replaces_types_by_name() {
        let mut assembly = Assembly::new("shop");
        assembly.add_type(TypeDescriptor::named("shop::A"));
        assembly.add_type(TypeDescriptor::named("shop::A").resource("/a", ""));
        assert_eq!(assembly.types().len(), 1);
        assert!(assembly.types()[0].resource_attribute().is_some());
    }
}
