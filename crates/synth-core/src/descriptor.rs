//! Type descriptors: the shape of a type as seen by the synthesis engine.
//!
//! A [`TypeDescriptor`] answers the questions the engine asks about a type:
//! is it composite (and if so, which constructor parameters does it take),
//! is it an enumeration (and which values does it have), and can it be
//! built from nothing. How the descriptor was obtained (YAML schema,
//! programmatic registration) is invisible to the engine.

use crate::types::TypeName;
use crate::values::{Record, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Error raised by a type's constructor.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConstructionError {
    /// A required parameter was not supplied
    #[error("missing argument for required parameter '{parameter}'")]
    MissingArgument { parameter: String },

    /// An argument was supplied for a parameter the constructor does not declare
    #[error("unexpected argument '{parameter}'")]
    UnexpectedArgument { parameter: String },

    /// The constructor rejected the assembled arguments
    #[error("rejected by constructor: {0}")]
    Rejected(String),
}

/// One formal constructor parameter of a composite type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    /// Parameter name
    pub name: String,

    /// Declared type of the parameter
    pub type_name: TypeName,

    /// Whether the declared type accepts the absent value
    pub nullable: bool,

    /// Whether the constructor supplies a value when the argument is omitted
    pub has_default: bool,
}

impl ParameterDescriptor {
    /// Create a required, non-nullable parameter.
    pub fn new(name: impl Into<String>, type_name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            nullable: false,
            has_default: false,
        }
    }

    /// Mark this parameter as nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark this parameter as defaulted.
    pub fn defaulted(mut self) -> Self {
        self.has_default = true;
        self
    }

    /// Whether an argument must be supplied for this parameter.
    pub fn is_required(&self) -> bool {
        !self.has_default
    }
}

/// Partial, named argument set passed to a composite constructor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Vec<(String, Value)>,
}

impl Arguments {
    /// Create an empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty argument set with room for `capacity` arguments.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    /// Set the argument for a parameter, replacing any earlier one.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.values.push((name, value)),
        }
    }

    /// Get the argument for a parameter.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// Remove and return the argument for a parameter.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        let idx = self.values.iter().position(|(n, _)| n == name)?;
        Some(self.values.remove(idx).1)
    }

    /// Names of the supplied arguments, in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.values.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Number of supplied arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no arguments were supplied.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

type ConstructFn = dyn Fn(Arguments) -> Result<Value, ConstructionError> + Send + Sync;
type ZeroArgFn = dyn Fn() -> Result<Value, ConstructionError> + Send + Sync;
type ValidateFn = dyn Fn(&Record) -> Result<(), String> + Send + Sync;

/// Canonical constructor of a composite type.
#[derive(Clone)]
pub struct Constructor(Arc<ConstructFn>);

impl Constructor {
    /// Wrap a constructor function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Arguments) -> Result<Value, ConstructionError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invoke the constructor with a partial argument set.
    pub fn construct(&self, args: Arguments) -> Result<Value, ConstructionError> {
        (self.0)(args)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Constructor(..)")
    }
}

/// Public zero-argument constructor of a type.
#[derive(Clone)]
pub struct ZeroArgConstructor(Arc<ZeroArgFn>);

impl ZeroArgConstructor {
    /// Wrap a zero-argument constructor function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Result<Value, ConstructionError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Zero-argument constructor that always returns a clone of `value`.
    pub fn returning(value: Value) -> Self {
        Self::new(move || Ok(value.clone()))
    }

    /// Invoke the constructor.
    pub fn construct(&self) -> Result<Value, ConstructionError> {
        (self.0)()
    }
}

impl fmt::Debug for ZeroArgConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ZeroArgConstructor(..)")
    }
}

/// Shape of a composite type: ordered parameters plus the canonical constructor.
#[derive(Debug, Clone)]
pub struct CompositeShape {
    parameters: Vec<ParameterDescriptor>,
    constructor: Constructor,
}

impl CompositeShape {
    /// Create a composite shape.
    pub fn new(parameters: Vec<ParameterDescriptor>, constructor: Constructor) -> Self {
        Self {
            parameters,
            constructor,
        }
    }

    /// All constructor parameters in declaration order.
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// Parameters without a default, in declaration order.
    pub fn required_parameters(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.parameters.iter().filter(|p| p.is_required())
    }

    /// The canonical constructor.
    pub fn constructor(&self) -> &Constructor {
        &self.constructor
    }
}

/// Shape of an enumeration type.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumerationShape {
    values: Vec<Value>,
}

impl EnumerationShape {
    /// Create an enumeration shape from its declared values.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Create an enumeration shape from variant names.
    pub fn from_variants<I, S>(type_name: &TypeName, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            variants
                .into_iter()
                .map(|v| Value::variant(type_name.clone(), v))
                .collect(),
        )
    }

    /// Declared values in order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// Shape of a type that is neither composite nor an enumeration.
#[derive(Debug, Clone, Default)]
pub struct OpaqueShape {
    zero_arg: Option<ZeroArgConstructor>,
}

impl OpaqueShape {
    /// Opaque type without a public zero-argument constructor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opaque type with a public zero-argument constructor.
    pub fn with_zero_arg(constructor: ZeroArgConstructor) -> Self {
        Self {
            zero_arg: Some(constructor),
        }
    }

    /// The zero-argument constructor, if the type exposes one.
    pub fn zero_arg_constructor(&self) -> Option<&ZeroArgConstructor> {
        self.zero_arg.as_ref()
    }
}

/// Structural shape of a type.
#[derive(Debug, Clone)]
pub enum TypeShape {
    /// Product type with one canonical constructor
    Composite(CompositeShape),
    /// Closed set of named values
    Enumeration(EnumerationShape),
    /// Anything else
    Opaque(OpaqueShape),
}

/// Description of a type, queryable by the synthesis engine.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    name: TypeName,
    shape: TypeShape,
}

impl TypeDescriptor {
    /// Create a descriptor from a name and a shape.
    pub fn new(name: impl Into<TypeName>, shape: TypeShape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }

    /// Describe a composite type.
    pub fn composite(name: impl Into<TypeName>, shape: CompositeShape) -> Self {
        Self::new(name, TypeShape::Composite(shape))
    }

    /// Describe an enumeration by its variant names.
    pub fn enumeration<I, S>(name: impl Into<TypeName>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let shape = EnumerationShape::from_variants(&name, variants);
        Self::new(name, TypeShape::Enumeration(shape))
    }

    /// Describe a type built by a public zero-argument constructor.
    pub fn default_constructible(
        name: impl Into<TypeName>,
        constructor: ZeroArgConstructor,
    ) -> Self {
        Self::new(
            name,
            TypeShape::Opaque(OpaqueShape::with_zero_arg(constructor)),
        )
    }

    /// Describe a type the engine knows nothing about beyond its name.
    pub fn opaque(name: impl Into<TypeName>) -> Self {
        Self::new(name, TypeShape::Opaque(OpaqueShape::new()))
    }

    /// Name of the described type.
    pub fn name(&self) -> &TypeName {
        &self.name
    }

    /// Structural shape of the described type.
    pub fn shape(&self) -> &TypeShape {
        &self.shape
    }

    /// Composite shape, if this is a composite type.
    pub fn as_composite(&self) -> Option<&CompositeShape> {
        match &self.shape {
            TypeShape::Composite(shape) => Some(shape),
            _ => None,
        }
    }

    /// Whether this is a composite type.
    pub fn is_composite(&self) -> bool {
        self.as_composite().is_some()
    }

    /// Enumeration values, if this is an enumeration type.
    pub fn enum_values(&self) -> Option<&[Value]> {
        match &self.shape {
            TypeShape::Enumeration(shape) => Some(shape.values()),
            _ => None,
        }
    }

    /// Zero-argument constructor, if the type exposes one.
    ///
    /// Composite types never report one; compositeness wins.
    pub fn zero_arg_constructor(&self) -> Option<&ZeroArgConstructor> {
        match &self.shape {
            TypeShape::Opaque(shape) => shape.zero_arg_constructor(),
            _ => None,
        }
    }
}

/// Builder for composite type descriptors.
///
/// Unless a custom constructor is installed, the built type uses a record
/// constructor: every declared parameter becomes a [`Record`] field, omitted
/// defaulted parameters take their declared default, and the optional
/// validator runs on the assembled record.
///
/// ```rust
/// use synth_core::{CompositeBuilder, Value};
///
/// let pair = CompositeBuilder::new("Pair")
///     .field("a", "string")
///     .nullable_field("b", "string")
///     .defaulted_field("c", "string", Value::from("x"))
///     .build();
///
/// assert!(pair.is_composite());
/// ```
pub struct CompositeBuilder {
    type_name: TypeName,
    parameters: Vec<ParameterDescriptor>,
    defaults: HashMap<String, Value>,
    validator: Option<Arc<ValidateFn>>,
    constructor: Option<Constructor>,
}

impl CompositeBuilder {
    /// Start a composite type with the given name.
    pub fn new(type_name: impl Into<TypeName>) -> Self {
        Self {
            type_name: type_name.into(),
            parameters: Vec::new(),
            defaults: HashMap::new(),
            validator: None,
            constructor: None,
        }
    }

    /// Add a required, non-nullable field.
    pub fn field(self, name: impl Into<String>, type_name: impl Into<TypeName>) -> Self {
        self.parameter(ParameterDescriptor::new(name, type_name), None)
    }

    /// Add a required, nullable field.
    pub fn nullable_field(self, name: impl Into<String>, type_name: impl Into<TypeName>) -> Self {
        self.parameter(ParameterDescriptor::new(name, type_name).nullable(), None)
    }

    /// Add a non-nullable field with a default value.
    pub fn defaulted_field(
        self,
        name: impl Into<String>,
        type_name: impl Into<TypeName>,
        default: Value,
    ) -> Self {
        self.parameter(ParameterDescriptor::new(name, type_name), Some(default))
    }

    /// Add a nullable field with a default value.
    pub fn nullable_defaulted_field(
        self,
        name: impl Into<String>,
        type_name: impl Into<TypeName>,
        default: Value,
    ) -> Self {
        self.parameter(
            ParameterDescriptor::new(name, type_name).nullable(),
            Some(default),
        )
    }

    /// Add a parameter. Supplying a default marks the parameter as defaulted.
    pub fn parameter(mut self, mut parameter: ParameterDescriptor, default: Option<Value>) -> Self {
        if let Some(default) = default {
            parameter.has_default = true;
            self.defaults.insert(parameter.name.clone(), default);
        }
        self.parameters.push(parameter);
        self
    }

    /// Validate assembled records; an `Err` rejects construction.
    pub fn validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Record) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(f));
        self
    }

    /// Replace the record constructor with a custom one.
    pub fn constructor(mut self, constructor: Constructor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// Names of parameters declared more than once.
    pub fn duplicate_parameters(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.parameters
            .iter()
            .filter(|p| !seen.insert(p.name.as_str()))
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Build the descriptor.
    pub fn build(self) -> TypeDescriptor {
        let constructor = match self.constructor {
            Some(constructor) => constructor,
            None => record_constructor(
                self.type_name.clone(),
                self.parameters.clone(),
                self.defaults,
                self.validator,
            ),
        };

        TypeDescriptor::composite(
            self.type_name,
            CompositeShape::new(self.parameters, constructor),
        )
    }
}

fn record_constructor(
    type_name: TypeName,
    parameters: Vec<ParameterDescriptor>,
    defaults: HashMap<String, Value>,
    validator: Option<Arc<ValidateFn>>,
) -> Constructor {
    Constructor::new(move |mut args: Arguments| {
        let mut fields = Vec::with_capacity(parameters.len());

        for parameter in &parameters {
            let value = match args.take(&parameter.name) {
                Some(value) => value,
                None => defaults.get(&parameter.name).cloned().ok_or_else(|| {
                    ConstructionError::MissingArgument {
                        parameter: parameter.name.clone(),
                    }
                })?,
            };
            fields.push((parameter.name.clone(), value));
        }

        if let Some(unexpected) = args.names().first() {
            return Err(ConstructionError::UnexpectedArgument {
                parameter: unexpected.to_string(),
            });
        }

        let record = Record::new(type_name.clone(), fields);
        if let Some(validate) = &validator {
            validate(&record).map_err(ConstructionError::Rejected)?;
        }

        Ok(Value::Record(record))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> TypeDescriptor {
        CompositeBuilder::new("Pair")
            .field("a", "string")
            .nullable_field("b", "string")
            .defaulted_field("c", "string", Value::from("x"))
            .build()
    }

    #[test]
    fn test_required_parameters_skip_defaults() {
        let pair = pair();
        let shape = pair.as_composite().unwrap();

        let required: Vec<_> = shape.required_parameters().map(|p| p.name.as_str()).collect();
        assert_eq!(required, vec!["a", "b"]);
        assert_eq!(shape.parameters().len(), 3);
        assert!(shape.parameters()[2].has_default);
    }

    #[test]
    fn test_record_constructor_applies_defaults() {
        let pair = pair();
        let mut args = Arguments::new();
        args.insert("a", Value::from("_"));
        args.insert("b", Value::Null);

        let value = pair.as_composite().unwrap().constructor().construct(args).unwrap();
        let record = value.as_record().unwrap();

        assert_eq!(record.type_name, TypeName::from("Pair"));
        assert_eq!(record.field_names(), vec!["a", "b", "c"]);
        assert_eq!(record.get("c"), Some(&Value::from("x")));
    }

    #[test]
    fn test_record_constructor_missing_argument() {
        let pair = pair();
        let mut args = Arguments::new();
        args.insert("b", Value::Null);

        let err = pair
            .as_composite()
            .unwrap()
            .constructor()
            .construct(args)
            .unwrap_err();
        assert_eq!(
            err,
            ConstructionError::MissingArgument {
                parameter: "a".to_string()
            }
        );
    }

    #[test]
    fn test_record_constructor_unexpected_argument() {
        let pair = pair();
        let mut args = Arguments::new();
        args.insert("a", Value::from("_"));
        args.insert("b", Value::Null);
        args.insert("z", Value::Bool(true));

        let err = pair
            .as_composite()
            .unwrap()
            .constructor()
            .construct(args)
            .unwrap_err();
        assert!(matches!(err, ConstructionError::UnexpectedArgument { parameter } if parameter == "z"));
    }

    #[test]
    fn test_validator_rejects() {
        let positive = CompositeBuilder::new("Positive")
            .field("n", "i32")
            .validate(|record| match record.get("n").and_then(Value::as_i64) {
                Some(n) if n > 0 => Ok(()),
                _ => Err("n must be positive".to_string()),
            })
            .build();

        let mut args = Arguments::new();
        args.insert("n", Value::Int32(0));
        let err = positive
            .as_composite()
            .unwrap()
            .constructor()
            .construct(args)
            .unwrap_err();
        assert_eq!(err, ConstructionError::Rejected("n must be positive".to_string()));
    }

    #[test]
    fn test_arguments_insert_replaces() {
        let mut args = Arguments::new();
        args.insert("a", Value::from("1"));
        args.insert("a", Value::from("2"));

        assert_eq!(args.len(), 1);
        assert_eq!(args.get("a"), Some(&Value::from("2")));
        assert_eq!(args.take("a"), Some(Value::from("2")));
        assert!(args.is_empty());
    }

    #[test]
    fn test_composite_never_reports_zero_arg_constructor() {
        assert!(pair().zero_arg_constructor().is_none());

        let counter =
            TypeDescriptor::default_constructible("Counter", ZeroArgConstructor::returning(Value::Int64(0)));
        assert_eq!(
            counter.zero_arg_constructor().unwrap().construct(),
            Ok(Value::Int64(0))
        );
        assert!(TypeDescriptor::opaque("Socket").zero_arg_constructor().is_none());
    }

    #[test]
    fn test_enumeration_values() {
        let color = TypeDescriptor::enumeration("Color", ["RED", "GREEN"]);
        let values = color.enum_values().unwrap();

        assert_eq!(values.len(), 2);
        assert_eq!(values[0].as_variant(), Some("RED"));
        assert!(pair().enum_values().is_none());
    }

    #[test]
    fn test_duplicate_parameters() {
        let builder = CompositeBuilder::new("Dup").field("a", "string").field("a", "i32");
        assert_eq!(builder.duplicate_parameters(), vec!["a"]);
    }
}
