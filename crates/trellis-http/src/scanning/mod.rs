//! Route discovery
//!
//! Types publish a static manifest ([`TypeDescriptor`]) of their routable
//! methods, grouped into [`Assembly`]s held by an [`AssemblyCatalog`]. The
//! [`RouteScanner`] walks that manifest, applying [`ScanFilters`], scope
//! checks and base-path composition, and produces routes in declaration order.

pub mod catalog;
pub mod descriptors;
pub mod filters;
pub mod paths;
pub mod scanner;

pub use catalog::AssemblyCatalog;
pub use descriptors::{
    Assembly, Instance, InstanceFactory, MethodDescriptor, MethodInvoker, MethodKind,
    MethodSignature, Receiver, Resource, ResourceAttribute, RouteAttribute, RouterFactory,
    TypeDescriptor, TypeKind, TypeRef,
};
pub use filters::ScanFilters;
pub use paths::{generate_base_path, generate_path_info, sanitize_base_path};
pub use scanner::RouteScanner;
