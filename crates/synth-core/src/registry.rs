//! Type metadata lookup.

use crate::descriptor::TypeDescriptor;
use crate::schema::{SchemaError, TypeSchema};
use crate::types::TypeName;
use std::collections::HashMap;
use std::path::Path;

/// Source of type descriptors for the synthesis engine.
///
/// Returning `None` means the type has no structural description; the
/// engine may still synthesize it through a policy's leaf generator.
pub trait TypeMetadata {
    /// Describe the type with the given name.
    fn describe(&self, name: &TypeName) -> Option<&TypeDescriptor>;
}

/// In-memory registry of type descriptors.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    /// Registered descriptors in registration order
    types: Vec<TypeDescriptor>,

    /// Cached name lookup
    type_map: HashMap<TypeName, usize>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a registry from a YAML schema file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        TypeSchema::from_file(path)?.into_registry()
    }

    /// Parse a registry from a YAML schema string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        TypeSchema::from_yaml(yaml)?.into_registry()
    }

    /// Register a descriptor. Names are unique.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> Result<(), SchemaError> {
        if self.type_map.contains_key(descriptor.name()) {
            return Err(SchemaError::DuplicateType(descriptor.name().to_string()));
        }
        self.type_map
            .insert(descriptor.name().clone(), self.types.len());
        self.types.push(descriptor);
        Ok(())
    }

    /// Register a descriptor, chaining.
    pub fn with(mut self, descriptor: TypeDescriptor) -> Result<Self, SchemaError> {
        self.register(descriptor)?;
        Ok(self)
    }

    /// Get a descriptor by name.
    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.type_map
            .get(name)
            .and_then(|&idx| self.types.get(idx))
    }

    /// All registered type names in registration order.
    pub fn type_names(&self) -> Vec<&TypeName> {
        self.types.iter().map(|t| t.name()).collect()
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeMetadata for TypeRegistry {
    fn describe(&self, name: &TypeName) -> Option<&TypeDescriptor> {
        self.get(name.as_str())
    }
}

impl<M: TypeMetadata + ?Sized> TypeMetadata for &M {
    fn describe(&self, name: &TypeName) -> Option<&TypeDescriptor> {
        (**self).describe(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::CompositeBuilder;

    #[test]
    fn test_register_and_describe() {
        let registry = TypeRegistry::new()
            .with(CompositeBuilder::new("Pair").field("a", "string").build())
            .unwrap()
            .with(TypeDescriptor::enumeration("Color", ["RED"]))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.describe(&TypeName::from("Pair")).unwrap().is_composite());
        assert!(registry.describe(&TypeName::from("string")).is_none());
        assert_eq!(
            registry.type_names(),
            vec![&TypeName::from("Pair"), &TypeName::from("Color")]
        );
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let mut registry = TypeRegistry::new();
        registry.register(TypeDescriptor::opaque("Socket")).unwrap();

        let err = registry
            .register(TypeDescriptor::enumeration("Socket", ["A"]))
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateType(name) if name == "Socket"));
        assert_eq!(registry.len(), 1);
    }
}
