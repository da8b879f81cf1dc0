//! Core types for the fixture-synth framework.
//!
//! This crate provides the foundational types shared by the synthesis
//! engine and its callers:
//!
//! - [`TypeName`] - Identity of a synthesizable type
//! - [`BuiltinType`] - Catalog of well-known leaf types
//! - [`TypeDescriptor`] - Shape of a type (composite, enumeration, opaque)
//! - [`Value`] - Synthesized instances
//! - [`TypeRegistry`] - Descriptors loaded from YAML or registered in code
//!
//! # Architecture
//!
//! ```text
//! synth-core (this crate)
//!    │
//!    ├─── synth-engine   (classifies types and synthesizes values)
//!    │
//!    └─── synth-json     (renders values as JSON, typed deserialization)
//! ```
//!
//! # Example
//!
//! ```rust
//! use synth_core::{TypeMetadata, TypeName, TypeRegistry};
//!
//! let registry = TypeRegistry::from_yaml(r#"
//! types:
//!   - name: Pair
//!     kind: composite
//!     fields:
//!       - { name: a, type: string }
//!       - { name: c, type: string, default: "x" }
//! "#).unwrap();
//!
//! let pair = registry.describe(&TypeName::from("Pair")).unwrap();
//! assert_eq!(pair.as_composite().unwrap().required_parameters().count(), 1);
//! ```

pub mod descriptor;
pub mod registry;
pub mod schema;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use descriptor::{
    Arguments, CompositeBuilder, CompositeShape, ConstructionError, Constructor,
    EnumerationShape, OpaqueShape, ParameterDescriptor, TypeDescriptor, TypeShape,
    ZeroArgConstructor,
};
pub use registry::{TypeMetadata, TypeRegistry};
pub use schema::{FieldDefinition, SchemaError, TypeDefinition, TypeSchema};
pub use types::{BuiltinType, CoercionError, TypeCategory, TypeName, UnknownBuiltin};
pub use values::{Record, Value};
