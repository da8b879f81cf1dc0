//! Value representations for synthesized instances.
//!
//! A [`Value`] is the dynamic instance produced by synthesis. Composite
//! instances are [`Record`]s whose fields keep constructor declaration order.

use crate::types::TypeName;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use serde_yaml::Value as YamlValue;
use std::collections::HashMap;
use uuid::Uuid;

/// A synthesized value.
///
/// `Null` is the absent value assigned to nullable required parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value
    Null,

    /// Boolean value
    Bool(bool),

    /// 8-bit signed integer
    Int8(i8),

    /// 16-bit signed integer
    Int16(i16),

    /// 32-bit signed integer
    Int32(i32),

    /// 64-bit signed integer
    Int64(i64),

    /// 8-bit unsigned integer
    UInt8(u8),

    /// 16-bit unsigned integer
    UInt16(u16),

    /// 32-bit unsigned integer
    UInt32(u32),

    /// 64-bit unsigned integer
    UInt64(u64),

    /// 32-bit floating point
    Float32(f32),

    /// 64-bit floating point
    Float64(f64),

    /// Single character
    Char(char),

    /// String value
    String(String),

    /// Decimal value stored as its string representation
    Decimal(String),

    /// Binary data
    Bytes(Vec<u8>),

    /// UUID value
    Uuid(Uuid),

    /// Calendar date
    Date(NaiveDate),

    /// Time of day
    Time(NaiveTime),

    /// Date/time in UTC
    DateTime(DateTime<Utc>),

    /// Date/time without timezone
    LocalDateTime(NaiveDateTime),

    /// Time duration
    Duration(TimeDelta),

    /// Ordered list of values
    List(Vec<Value>),

    /// Set of values
    Set(Vec<Value>),

    /// Map of key/value pairs
    Map(Vec<(Value, Value)>),

    /// Lazily consumed sequence of values
    Sequence(Vec<Value>),

    /// String-keyed object (from YAML mappings)
    Object(HashMap<String, Value>),

    /// One named value of an enumeration type
    Enum {
        /// Enumeration type
        type_name: TypeName,
        /// Selected variant
        variant: String,
    },

    /// Instance of a composite type
    Record(Record),
}

impl Value {
    /// Create an enumeration value.
    pub fn variant(type_name: impl Into<TypeName>, variant: impl Into<String>) -> Self {
        Self::Enum {
            type_name: type_name.into(),
            variant: variant.into(),
        }
    }

    /// Check if this value is the absent value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an i64.
    ///
    /// Every integer width that fits is accepted.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_integer().and_then(|i| i64::try_from(i).ok())
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float64(f) => Some(*f),
            Self::Float32(f) => Some(f64::from(*f)),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a UUID.
    pub fn as_uuid(&self) -> Option<&Uuid> {
        match self {
            Self::Uuid(u) => Some(u),
            _ => None,
        }
    }

    /// Try to get this value as a record.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Try to get the variant name of an enumeration value.
    pub fn as_variant(&self) -> Option<&str> {
        match self {
            Self::Enum { variant, .. } => Some(variant),
            _ => None,
        }
    }

    /// Widen any integer value to i128.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Self::Int8(i) => Some(i128::from(*i)),
            Self::Int16(i) => Some(i128::from(*i)),
            Self::Int32(i) => Some(i128::from(*i)),
            Self::Int64(i) => Some(i128::from(*i)),
            Self::UInt8(i) => Some(i128::from(*i)),
            Self::UInt16(i) => Some(i128::from(*i)),
            Self::UInt32(i) => Some(i128::from(*i)),
            Self::UInt64(i) => Some(i128::from(*i)),
            _ => None,
        }
    }

    /// Number of elements for container values, `None` for everything else.
    pub fn container_len(&self) -> Option<usize> {
        match self {
            Self::List(v) | Self::Set(v) | Self::Sequence(v) => Some(v.len()),
            Self::Map(m) => Some(m.len()),
            Self::Object(o) => Some(o.len()),
            _ => None,
        }
    }

    /// Short name of the value kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int8(_) => "i8",
            Self::Int16(_) => "i16",
            Self::Int32(_) => "i32",
            Self::Int64(_) => "i64",
            Self::UInt8(_) => "u8",
            Self::UInt16(_) => "u16",
            Self::UInt32(_) => "u32",
            Self::UInt64(_) => "u64",
            Self::Float32(_) => "f32",
            Self::Float64(_) => "f64",
            Self::Char(_) => "char",
            Self::String(_) => "string",
            Self::Decimal(_) => "decimal",
            Self::Bytes(_) => "bytes",
            Self::Uuid(_) => "uuid",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::DateTime(_) => "datetime",
            Self::LocalDateTime(_) => "local_datetime",
            Self::Duration(_) => "duration",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
            Self::Sequence(_) => "sequence",
            Self::Object(_) => "object",
            Self::Enum { .. } => "enum",
            Self::Record(_) => "record",
        }
    }

    /// Convert a YAML value to a Value.
    pub fn from_yaml(yaml: &YamlValue) -> Self {
        match yaml {
            YamlValue::Null => Value::Null,
            YamlValue::Bool(b) => Value::Bool(*b),
            YamlValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int64(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt64(u)
                } else if let Some(f) = n.as_f64() {
                    Value::Float64(f)
                } else {
                    Value::String(n.to_string())
                }
            }
            YamlValue::String(s) => Value::String(s.clone()),
            YamlValue::Sequence(arr) => Value::List(arr.iter().map(Value::from_yaml).collect()),
            YamlValue::Mapping(map) => {
                let values: HashMap<String, Value> = map
                    .iter()
                    .filter_map(|(k, v)| {
                        let key = match k {
                            YamlValue::String(s) => s.clone(),
                            YamlValue::Number(n) => n.to_string(),
                            YamlValue::Bool(b) => b.to_string(),
                            _ => return None,
                        };
                        Some((key, Value::from_yaml(v)))
                    })
                    .collect();
                Value::Object(values)
            }
            YamlValue::Tagged(tagged) => Value::from_yaml(&tagged.value),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int32(i)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int64(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float64(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

/// Instance of a composite type.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Composite type this record instantiates
    pub type_name: TypeName,

    /// Field values in constructor declaration order
    pub fields: Vec<(String, Value)>,
}

impl Record {
    /// Create a new record.
    pub fn new(type_name: impl Into<TypeName>, fields: Vec<(String, Value)>) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
        }
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Get all field names in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }
}
