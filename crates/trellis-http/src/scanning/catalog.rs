//! Catalog of loaded assemblies
//!
//! `#[resource]` registers every annotated type into the global catalog at
//! load time (through `ctor`), grouped under the defining crate's package
//! name. `RouteScanner::scan` walks whatever catalog it was given, so tests
//! can work against a private one.
//!
//! ```rust,ignore
//! #[resource(base_path = "/users")]
//! impl UserResource { ... }
//!
//! // expands, among other things, to:
//! // AssemblyCatalog::global().register_type("my-app", UserResource::descriptor());
//! ```

use super::{Assembly, TypeDescriptor};
use once_cell::sync::Lazy;
use std::sync::{Arc, PoisonError, RwLock};

static GLOBAL_CATALOG: Lazy<Arc<AssemblyCatalog>> = Lazy::new(|| Arc::new(AssemblyCatalog::new()));

/// Thread-safe list of assemblies, in load order
#[derive(Debug, Default)]
pub struct AssemblyCatalog {
    assemblies: RwLock<Vec<Assembly>>,
}

impl AssemblyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide catalog populated by `#[resource]`
    pub fn global() -> Arc<AssemblyCatalog> {
        Arc::clone(&GLOBAL_CATALOG)
    }

    /// Load an assembly, merging its types into one already loaded under the same name
    pub fn load(&self, assembly: Assembly) {
        let mut assemblies = self
            .assemblies
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        match assemblies.iter_mut().find(|a| a.name() == assembly.name()) {
            Some(existing) => {
                for descriptor in assembly.types() {
                    existing.add_type(descriptor.clone());
                }
            }
            None => assemblies.push(assembly),
        }
    }

    /// Add one type to the named assembly, creating the assembly if needed
    pub fn register_type(&self, assembly: &str, descriptor: TypeDescriptor) {
        tracing::debug!(
            "Registered resource type {} in assembly {}",
            descriptor.name(),
            assembly
        );
        self.load(Assembly::new(assembly).with_type(descriptor));
    }

    /// Snapshot of the loaded assemblies
    pub fn assemblies(&self) -> Vec<Assembly> {
        self.assemblies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn find(&self, name: &str) -> Option<Assembly> {
        self.assemblies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|assembly| assembly.name() == name)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.assemblies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registers a resource type in the global catalog when the binary loads
///
/// Emitted by `#[resource]`; not meant to be called directly.
#[macro_export]
#[doc(hidden)]
macro_rules! __resource_auto_register {
    ($type:ty) => {
        const _: () = {
            #[$crate::__private::ctor]
            fn __trellis_register_resource() {
                $crate::scanning::AssemblyCatalog::global().register_type(
                    env!("CARGO_PKG_NAME"),
                    <$type as $crate::scanning::Resource>::descriptor(),
                );
            }
        };
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_keeps_order_and_merges_by_name() {
        let catalog = AssemblyCatalog::new();
        catalog.load(Assembly::new("shop").with_type(TypeDescriptor::named("shop::A")));
        catalog.load(Assembly::new("billing"));
        catalog.register_type("shop", TypeDescriptor::named("shop::B"));

        let assemblies = catalog.assemblies();
        assert_eq!(assemblies.len(), 2);
        assert_eq!(assemblies[0].name(), "shop");
        assert_eq!(assemblies[1].name(), "billing");

        let shop = catalog.find("shop").unwrap();
        let names: Vec<&str> = shop.types().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["shop::A", "shop::B"]);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = AssemblyCatalog::new();
        assert!(catalog.is_empty());
        assert!(catalog.find("missing").is_none());
    }
}
