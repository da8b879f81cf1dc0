//! YAML schema definitions for synthesizable types.
//!
//! A schema file lists the types the engine may need to decompose. Builtin
//! leaf types (see [`BuiltinType`](crate::types::BuiltinType)) never need to
//! be declared.
//!
//! ```yaml
//! version: 1
//! types:
//!   - name: Pair
//!     kind: composite
//!     fields:
//!       - { name: a, type: string }
//!       - { name: b, type: string, nullable: true }
//!       - { name: c, type: string, default: "x" }
//!   - { name: Color, kind: enumeration, values: [RED, GREEN] }
//!   - { name: Counter, kind: default_constructible, value: 0 }
//!   - { name: Socket, kind: opaque }
//! ```

use crate::descriptor::{CompositeBuilder, ParameterDescriptor, TypeDescriptor, ZeroArgConstructor};
use crate::registry::TypeRegistry;
use crate::types::{CoercionError, TypeName};
use crate::values::Value;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Type declared twice
    #[error("Type declared more than once: {0}")]
    DuplicateType(String),

    /// Field declared twice in one composite
    #[error("Field '{field}' declared more than once in type '{type_name}'")]
    DuplicateField { type_name: String, field: String },

    /// Default value does not fit the field's builtin type
    #[error("Invalid default for field '{field}' in type '{type_name}': {source}")]
    InvalidDefault {
        type_name: String,
        field: String,
        #[source]
        source: CoercionError,
    },
}

// ============================================================================
// Definitions
// ============================================================================

/// Field of a composite type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field name
    pub name: String,

    /// Declared field type
    #[serde(rename = "type")]
    pub type_name: TypeName,

    /// Whether this field accepts the absent value
    #[serde(default)]
    pub nullable: bool,

    /// Default value; present (even as `null`) means the field is defaulted
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<serde_yaml::Value>,
}

impl FieldDefinition {
    /// Whether the field declares a default value.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Convert to a parameter descriptor (discarding the default value).
    pub fn to_parameter_descriptor(&self) -> ParameterDescriptor {
        ParameterDescriptor {
            name: self.name.clone(),
            type_name: self.type_name.clone(),
            nullable: self.nullable,
            has_default: self.has_default(),
        }
    }

    /// Resolve the default value, coerced to the field's builtin type.
    fn default_value(&self, owner: &TypeName) -> Result<Option<Value>, SchemaError> {
        let Some(yaml) = &self.default else {
            return Ok(None);
        };

        let value = Value::from_yaml(yaml);
        let value = match self.type_name.builtin() {
            Some(builtin) => builtin
                .coerce(value)
                .map_err(|source| SchemaError::InvalidDefault {
                    type_name: owner.to_string(),
                    field: self.name.clone(),
                    source,
                })?,
            None => value,
        };
        Ok(Some(value))
    }
}

// `Option<T>` maps an explicit `null` to `None`; a present key must be `Some`.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<serde_yaml::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_yaml::Value::deserialize(deserializer).map(Some)
}

/// One type declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDefinition {
    /// Product type built from named fields
    Composite {
        /// Type name
        name: TypeName,
        /// Constructor parameters in declaration order
        #[serde(default)]
        fields: Vec<FieldDefinition>,
    },

    /// Closed set of named values
    Enumeration {
        /// Type name
        name: TypeName,
        /// Variant names in declaration order
        #[serde(default)]
        values: Vec<String>,
    },

    /// Type whose zero-argument constructor yields a fixed value
    DefaultConstructible {
        /// Type name
        name: TypeName,
        /// Value produced by the zero-argument constructor
        #[serde(default)]
        value: serde_yaml::Value,
    },

    /// Type with no structure and no zero-argument constructor
    Opaque {
        /// Type name
        name: TypeName,
    },
}

impl TypeDefinition {
    /// Name of the declared type.
    pub fn name(&self) -> &TypeName {
        match self {
            Self::Composite { name, .. }
            | Self::Enumeration { name, .. }
            | Self::DefaultConstructible { name, .. }
            | Self::Opaque { name } => name,
        }
    }

    /// Convert to a type descriptor.
    pub fn to_descriptor(&self) -> Result<TypeDescriptor, SchemaError> {
        match self {
            Self::Composite { name, fields } => {
                let mut builder = CompositeBuilder::new(name.clone());
                for field in fields {
                    builder = builder.parameter(field.to_parameter_descriptor(), field.default_value(name)?);
                }
                if let Some(field) = builder.duplicate_parameters().first() {
                    return Err(SchemaError::DuplicateField {
                        type_name: name.to_string(),
                        field: field.to_string(),
                    });
                }
                Ok(builder.build())
            }
            Self::Enumeration { name, values } => {
                Ok(TypeDescriptor::enumeration(name.clone(), values.iter().cloned()))
            }
            Self::DefaultConstructible { name, value } => Ok(TypeDescriptor::default_constructible(
                name.clone(),
                ZeroArgConstructor::returning(Value::from_yaml(value)),
            )),
            Self::Opaque { name } => Ok(TypeDescriptor::opaque(name.clone())),
        }
    }
}

fn default_version() -> u32 {
    1
}

/// Full schema of declared types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSchema {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Type declarations
    #[serde(default)]
    pub types: Vec<TypeDefinition>,
}

impl TypeSchema {
    /// Load schema from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse schema from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Get a type declaration by name.
    pub fn get_type(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.iter().find(|t| t.name().as_str() == name)
    }

    /// Get all declared type names.
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.name().as_str()).collect()
    }

    /// Build a registry holding a descriptor for every declaration.
    pub fn into_registry(self) -> Result<TypeRegistry, SchemaError> {
        let mut registry = TypeRegistry::new();
        for definition in &self.types {
            registry.register(definition.to_descriptor()?)?;
        }
        Ok(registry)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Arguments;
    use crate::registry::TypeMetadata;
    use std::io::Write;

    const SCHEMA: &str = r#"
version: 1
types:
  - name: Pair
    kind: composite
    fields:
      - name: a
        type: string
      - name: b
        type: string
        nullable: true
      - name: c
        type: string
        default: "x"
      - name: d
        type: string
        nullable: true
        default: null
  - name: Color
    kind: enumeration
    values: [RED, GREEN, BLUE]
  - name: Counter
    kind: default_constructible
    value: 0
  - name: Socket
    kind: opaque
"#;

    #[test]
    fn test_parse_schema() {
        let schema = TypeSchema::from_yaml(SCHEMA).unwrap();

        assert_eq!(schema.version, 1);
        assert_eq!(schema.type_names(), vec!["Pair", "Color", "Counter", "Socket"]);
        assert!(matches!(
            schema.get_type("Color"),
            Some(TypeDefinition::Enumeration { values, .. }) if values.len() == 3
        ));
    }

    #[test]
    fn test_default_presence() {
        let schema = TypeSchema::from_yaml(SCHEMA).unwrap();
        let Some(TypeDefinition::Composite { fields, .. }) = schema.get_type("Pair") else {
            panic!("Expected composite Pair");
        };

        let defaulted: Vec<_> = fields.iter().map(FieldDefinition::has_default).collect();
        assert_eq!(defaulted, vec![false, false, true, true]);
    }

    #[test]
    fn test_into_registry() {
        let registry = TypeSchema::from_yaml(SCHEMA).unwrap().into_registry().unwrap();

        let pair = registry.describe(&TypeName::from("Pair")).unwrap();
        let required: Vec<_> = pair
            .as_composite()
            .unwrap()
            .required_parameters()
            .map(|p| (p.name.as_str(), p.nullable))
            .collect();
        assert_eq!(required, vec![("a", false), ("b", true)]);

        let counter = registry.describe(&TypeName::from("Counter")).unwrap();
        assert_eq!(
            counter.zero_arg_constructor().unwrap().construct(),
            Ok(Value::Int64(0))
        );

        let socket = registry.describe(&TypeName::from("Socket")).unwrap();
        assert!(socket.zero_arg_constructor().is_none());
        assert!(socket.enum_values().is_none());
    }

    #[test]
    fn test_null_default_is_applied() {
        let registry = TypeRegistry::from_yaml(SCHEMA).unwrap();
        let pair = registry.get("Pair").unwrap();

        let mut args = Arguments::new();
        args.insert("a", Value::from("_"));
        args.insert("b", Value::Null);
        let value = pair.as_composite().unwrap().constructor().construct(args).unwrap();

        let record = value.as_record().unwrap();
        assert_eq!(record.get("c"), Some(&Value::from("x")));
        assert_eq!(record.get("d"), Some(&Value::Null));
    }

    #[test]
    fn test_default_coerced_to_builtin() {
        let yaml = r#"
types:
  - name: Limits
    kind: composite
    fields:
      - { name: max, type: u16, default: 10 }
      - { name: since, type: date, default: "2024-01-01" }
"#;
        let registry = TypeRegistry::from_yaml(yaml).unwrap();
        let limits = registry.get("Limits").unwrap();
        let value = limits
            .as_composite()
            .unwrap()
            .constructor()
            .construct(Arguments::new())
            .unwrap();

        let record = value.as_record().unwrap();
        assert_eq!(record.get("max"), Some(&Value::UInt16(10)));
        assert!(matches!(record.get("since"), Some(Value::Date(_))));
    }

    #[test]
    fn test_invalid_default() {
        let yaml = r#"
types:
  - name: Bad
    kind: composite
    fields:
      - { name: small, type: u8, default: 300 }
"#;
        let err = TypeRegistry::from_yaml(yaml).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidDefault { ref type_name, ref field, .. }
                if type_name == "Bad" && field == "small"
        ));
    }

    #[test]
    fn test_duplicate_field() {
        let yaml = r#"
types:
  - name: Dup
    kind: composite
    fields:
      - { name: a, type: string }
      - { name: a, type: i32 }
"#;
        let err = TypeRegistry::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { .. }));
    }

    #[test]
    fn test_duplicate_type() {
        let yaml = r#"
types:
  - { name: Socket, kind: opaque }
  - { name: Socket, kind: enumeration, values: [A] }
"#;
        let err = TypeRegistry::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateType(name) if name == "Socket"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SCHEMA.as_bytes()).unwrap();

        let registry = TypeRegistry::from_file(file.path()).unwrap();
        assert_eq!(registry.len(), 4);

        let err = TypeRegistry::from_file("/nonexistent/schema.yaml").unwrap_err();
        assert!(matches!(err, SchemaError::IoError(_)));
    }
}
