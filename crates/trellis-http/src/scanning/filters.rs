//! Include/exclude rules over assemblies, types and namespaces
//!
//! An empty include set lets everything through. Exclusion always wins over
//! inclusion when both name the same item.

use super::TypeDescriptor;
use std::any::type_name;
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct ScanFilters {
    excluded_assemblies: HashSet<String>,
    included_assemblies: HashSet<String>,
    excluded_types: HashSet<String>,
    included_types: HashSet<String>,
    excluded_namespaces: HashSet<String>,
    included_namespaces: HashSet<String>,
}

impl ScanFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exclude_assembly<N: Into<String>>(&mut self, name: N) -> &mut Self {
        self.excluded_assemblies.insert(name.into());
        self
    }

    pub fn include_assembly<N: Into<String>>(&mut self, name: N) -> &mut Self {
        self.included_assemblies.insert(name.into());
        self
    }

    pub fn exclude_type<T: ?Sized + 'static>(&mut self) -> &mut Self {
        self.exclude_type_named(type_name::<T>())
    }

    pub fn exclude_type_named<N: Into<String>>(&mut self, name: N) -> &mut Self {
        self.excluded_types.insert(name.into());
        self
    }

    pub fn include_type<T: ?Sized + 'static>(&mut self) -> &mut Self {
        self.include_type_named(type_name::<T>())
    }

    pub fn include_type_named<N: Into<String>>(&mut self, name: N) -> &mut Self {
        self.included_types.insert(name.into());
        self
    }

    pub fn exclude_namespace<N: Into<String>>(&mut self, namespace: N) -> &mut Self {
        self.excluded_namespaces.insert(namespace.into());
        self
    }

    pub fn include_namespace<N: Into<String>>(&mut self, namespace: N) -> &mut Self {
        self.included_namespaces.insert(namespace.into());
        self
    }

    pub fn is_included_assembly(&self, name: &str) -> bool {
        self.included_assemblies.is_empty() || self.included_assemblies.contains(name)
    }

    pub fn is_excluded_assembly(&self, name: &str) -> bool {
        self.excluded_assemblies.contains(name) || !self.is_included_assembly(name)
    }

    pub fn is_included_type(&self, descriptor: &TypeDescriptor) -> bool {
        if self.included_types.is_empty() && self.included_namespaces.is_empty() {
            return true;
        }
        self.included_types.contains(descriptor.name())
            || self.included_namespaces.contains(descriptor.namespace())
    }

    pub fn is_excluded_type(&self, descriptor: &TypeDescriptor) -> bool {
        self.excluded_types.contains(descriptor.name())
            || self.excluded_namespaces.contains(descriptor.namespace())
            || !self.is_included_type(descriptor)
    }

    pub fn is_excluded_namespace(&self, namespace: &str) -> bool {
        self.excluded_namespaces.contains(namespace)
            || (!self.included_namespaces.is_empty() && !self.included_namespaces.contains(namespace))
    }

    pub fn is_empty(&self) -> bool {
        self.excluded_assemblies.is_empty()
            && self.included_assemblies.is_empty()
            && self.excluded_types.is_empty()
            && self.included_types.is_empty()
            && self.excluded_namespaces.is_empty()
            && self.included_namespaces.is_empty()
    }
}
