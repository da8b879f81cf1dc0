//! Type identities and the builtin leaf type catalog.
//!
//! `TypeName` is the identity of a synthesizable type: two types are the
//! same type exactly when their names are equal. `BuiltinType` names the
//! well-known leaf types that the shipped policies register generators for.

use crate::values::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Name of a synthesizable type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    /// Create a new type name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Look up the builtin type with this name, if any.
    pub fn builtin(&self) -> Option<BuiltinType> {
        self.0.parse().ok()
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<BuiltinType> for TypeName {
    fn from(builtin: BuiltinType) -> Self {
        Self(builtin.as_str().to_string())
    }
}

impl Borrow<str> for TypeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Synthesis category of a type, in classification order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    /// Product type with a single canonical constructor
    Composite,
    /// Closed set of named singleton values
    Enumeration,
    /// Type with a generator registered in the active policy
    RegisteredLeaf,
    /// Type exposing a zero-argument constructor
    DefaultConstructible,
    /// None of the above
    Unsupported,
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Composite => "composite",
            Self::Enumeration => "enumeration",
            Self::RegisteredLeaf => "registered_leaf",
            Self::DefaultConstructible => "default_constructible",
            Self::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

/// Well-known leaf types.
///
/// # YAML Format
///
/// Builtins are referenced by their snake_case name wherever a type name is
/// expected:
/// ```yaml
/// type: string
/// type: i32
/// type: local_datetime
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    // Boolean
    /// Boolean value
    Bool,

    // Integer types (sized)
    /// 8-bit signed integer
    I8,
    /// 16-bit signed integer
    I16,
    /// 32-bit signed integer
    I32,
    /// 64-bit signed integer
    I64,
    /// 8-bit unsigned integer
    U8,
    /// 16-bit unsigned integer
    U16,
    /// 32-bit unsigned integer
    U32,
    /// 64-bit unsigned integer
    U64,

    // Floating point
    /// 32-bit IEEE 754 floating point
    F32,
    /// 64-bit IEEE 754 floating point
    F64,

    // Text
    /// Single character
    Char,
    /// UTF-8 string
    String,

    // Exact numeric
    /// Decimal number kept as a string
    Decimal,

    // Binary
    /// Binary data
    Bytes,

    // Special
    /// UUID (128-bit)
    Uuid,

    // Temporal types
    /// Date only (YYYY-MM-DD)
    Date,
    /// Time only (HH:MM:SS)
    Time,
    /// Timestamp with UTC timezone
    DateTime,
    /// Timestamp without timezone
    LocalDateTime,
    /// Time duration
    Duration,

    // Containers (always synthesized empty)
    /// Ordered list
    List,
    /// Unordered set
    Set,
    /// Key/value map
    Map,
    /// Lazily consumed sequence
    Sequence,
}

impl BuiltinType {
    /// Every builtin type, in catalog order.
    pub const ALL: [BuiltinType; 25] = [
        Self::Bool,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::F32,
        Self::F64,
        Self::Char,
        Self::String,
        Self::Decimal,
        Self::Bytes,
        Self::Uuid,
        Self::Date,
        Self::Time,
        Self::DateTime,
        Self::LocalDateTime,
        Self::Duration,
        Self::List,
        Self::Set,
        Self::Map,
        Self::Sequence,
    ];

    /// Snake_case name of this builtin.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Char => "char",
            Self::String => "string",
            Self::Decimal => "decimal",
            Self::Bytes => "bytes",
            Self::Uuid => "uuid",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
            Self::LocalDateTime => "local_datetime",
            Self::Duration => "duration",
            Self::List => "list",
            Self::Set => "set",
            Self::Map => "map",
            Self::Sequence => "sequence",
        }
    }

    /// Type name of this builtin.
    pub fn type_name(&self) -> TypeName {
        TypeName::from(*self)
    }

    /// Whether this is a container type (list/set/map/sequence).
    pub fn is_container(&self) -> bool {
        matches!(self, Self::List | Self::Set | Self::Map | Self::Sequence)
    }

    /// Whether this is one of the integer types.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::U8 | Self::U16 | Self::U32 | Self::U64
        )
    }

    /// Coerce a loosely typed value (as read from YAML) into this builtin's
    /// value representation.
    ///
    /// `Null` passes through unchanged for every builtin.
    pub fn coerce(&self, value: Value) -> Result<Value, CoercionError> {
        if value.is_null() {
            return Ok(value);
        }

        let err = |value: &Value| CoercionError {
            target: *self,
            found: value.kind(),
        };

        let coerced = match (self, &value) {
            (Self::Bool, Value::Bool(_)) => Some(value.clone()),

            (builtin, v) if builtin.is_integer() => {
                v.as_integer().and_then(|i| builtin.narrow_integer(i))
            }

            // Finite doubles beyond the f32 range do not fit
            (Self::F32, Value::Float64(f)) => {
                let narrowed = *f as f32;
                (narrowed.is_finite() || !f.is_finite()).then_some(Value::Float32(narrowed))
            }
            (Self::F32, Value::Float32(_)) => Some(value.clone()),
            (Self::F32, v) => v.as_integer().map(|i| Value::Float32(i as f32)),
            (Self::F64, Value::Float32(f)) => Some(Value::Float64(f64::from(*f))),
            (Self::F64, Value::Float64(_)) => Some(value.clone()),
            (Self::F64, v) => v.as_integer().map(|i| Value::Float64(i as f64)),

            (Self::Char, Value::Char(_)) => Some(value.clone()),
            (Self::Char, Value::String(s)) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Value::Char(c)),
                    _ => None,
                }
            }

            (Self::String, Value::String(_)) => Some(value.clone()),

            (Self::Decimal, Value::Decimal(_)) => Some(value.clone()),
            (Self::Decimal, Value::String(s)) => s
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(|_| Value::Decimal(s.clone())),
            (Self::Decimal, Value::Float64(f)) => {
                f.is_finite().then(|| Value::Decimal(f.to_string()))
            }
            (Self::Decimal, v) => v.as_integer().map(|i| Value::Decimal(i.to_string())),

            (Self::Bytes, Value::Bytes(_)) => Some(value.clone()),
            (Self::Bytes, Value::String(s)) => Some(Value::Bytes(s.as_bytes().to_vec())),

            (Self::Uuid, Value::Uuid(_)) => Some(value.clone()),
            (Self::Uuid, Value::String(s)) => Uuid::parse_str(s).ok().map(Value::Uuid),

            (Self::Date, Value::Date(_)) => Some(value.clone()),
            (Self::Date, Value::String(s)) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(Value::Date),

            (Self::Time, Value::Time(_)) => Some(value.clone()),
            (Self::Time, Value::String(s)) => NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
                .ok()
                .map(Value::Time),

            (Self::DateTime, Value::DateTime(_)) => Some(value.clone()),
            (Self::DateTime, Value::String(s)) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| Value::DateTime(dt.with_timezone(&Utc))),

            (Self::LocalDateTime, Value::LocalDateTime(_)) => Some(value.clone()),
            (Self::LocalDateTime, Value::String(s)) => {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(Value::LocalDateTime)
            }

            (Self::Duration, Value::Duration(_)) => Some(value.clone()),
            (Self::Duration, v) => v
                .as_i64()
                .and_then(TimeDelta::try_seconds)
                .map(Value::Duration),

            (Self::List, Value::List(_)) => Some(value.clone()),
            (Self::Set, Value::Set(_)) => Some(value.clone()),
            (Self::Set, Value::List(items)) => Some(Value::Set(items.clone())),
            (Self::Sequence, Value::Sequence(_)) => Some(value.clone()),
            (Self::Sequence, Value::List(items)) => Some(Value::Sequence(items.clone())),
            (Self::Map, Value::Map(_)) => Some(value.clone()),
            (Self::Map, Value::Object(obj)) => {
                let mut pairs: Vec<(Value, Value)> = obj
                    .iter()
                    .map(|(k, v)| (Value::String(k.clone()), v.clone()))
                    .collect();
                pairs.sort_by(|(a, _), (b, _)| a.as_str().cmp(&b.as_str()));
                Some(Value::Map(pairs))
            }

            _ => None,
        };

        coerced.ok_or_else(|| err(&value))
    }

    /// Narrow an integer into this builtin's width, `None` if it does not fit
    /// or this builtin is not an integer type.
    pub fn narrow_integer(&self, i: i128) -> Option<Value> {
        match self {
            Self::I8 => i8::try_from(i).ok().map(Value::Int8),
            Self::I16 => i16::try_from(i).ok().map(Value::Int16),
            Self::I32 => i32::try_from(i).ok().map(Value::Int32),
            Self::I64 => i64::try_from(i).ok().map(Value::Int64),
            Self::U8 => u8::try_from(i).ok().map(Value::UInt8),
            Self::U16 => u16::try_from(i).ok().map(Value::UInt16),
            Self::U32 => u32::try_from(i).ok().map(Value::UInt32),
            Self::U64 => u64::try_from(i).ok().map(Value::UInt64),
            _ => None,
        }
    }
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuiltinType {
    type Err = UnknownBuiltin;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|builtin| builtin.as_str() == s)
            .ok_or_else(|| UnknownBuiltin(s.to_string()))
    }
}

impl Serialize for BuiltinType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BuiltinType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// A name that is not a builtin type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown builtin type: {0}")]
pub struct UnknownBuiltin(pub String);

/// A value that cannot be represented as the requested builtin.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot coerce {found} value into {target}")]
pub struct CoercionError {
    /// Builtin that was requested
    pub target: BuiltinType,
    /// Kind of the offending value
    pub found: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names_round_trip_through_from_str() {
        for builtin in BuiltinType::ALL {
            assert_eq!(builtin.as_str().parse::<BuiltinType>(), Ok(builtin));
        }
        assert!("varchar".parse::<BuiltinType>().is_err());
    }

    #[test]
    fn test_builtin_deserialize() {
        let builtin: BuiltinType = serde_yaml::from_str("local_datetime").unwrap();
        assert_eq!(builtin, BuiltinType::LocalDateTime);

        let err = serde_yaml::from_str::<BuiltinType>("text").unwrap_err();
        assert!(err.to_string().contains("unknown builtin type"));
    }

    #[test]
    fn test_containers() {
        let containers: Vec<_> = BuiltinType::ALL
            .iter()
            .filter(|b| b.is_container())
            .collect();
        assert_eq!(
            containers,
            vec![
                &BuiltinType::List,
                &BuiltinType::Set,
                &BuiltinType::Map,
                &BuiltinType::Sequence
            ]
        );
    }

    #[test]
    fn test_type_name_builtin_lookup() {
        assert_eq!(TypeName::from("u16").builtin(), Some(BuiltinType::U16));
        assert_eq!(TypeName::from("Pair").builtin(), None);
        assert_eq!(BuiltinType::Uuid.type_name(), TypeName::from("uuid"));
    }

    #[test]
    fn test_coerce_integers() {
        assert_eq!(BuiltinType::I8.coerce(Value::Int64(12)), Ok(Value::Int8(12)));
        assert_eq!(
            BuiltinType::U32.coerce(Value::Int64(7)),
            Ok(Value::UInt32(7))
        );

        let err = BuiltinType::U8.coerce(Value::Int64(-1)).unwrap_err();
        assert_eq!(err.target, BuiltinType::U8);
        assert_eq!(err.found, "i64");
    }

    #[test]
    fn test_coerce_text_and_temporal() {
        assert_eq!(
            BuiltinType::Char.coerce(Value::from("x")),
            Ok(Value::Char('x'))
        );
        assert!(BuiltinType::Char.coerce(Value::from("xy")).is_err());

        assert_eq!(
            BuiltinType::Date.coerce(Value::from("2024-02-29")),
            Ok(Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()))
        );
        assert!(BuiltinType::Date.coerce(Value::from("2023-02-29")).is_err());

        assert_eq!(
            BuiltinType::Duration.coerce(Value::Int64(90)),
            Ok(Value::Duration(TimeDelta::seconds(90)))
        );

        assert_eq!(
            BuiltinType::Decimal.coerce(Value::from("12.50")),
            Ok(Value::Decimal("12.50".to_string()))
        );
        assert!(BuiltinType::Decimal.coerce(Value::from("abc")).is_err());
    }

    #[test]
    fn test_coerce_decimal_rejects_non_finite() {
        for text in ["NaN", "inf", "-infinity"] {
            assert!(BuiltinType::Decimal.coerce(Value::from(text)).is_err(), "{text}");
        }
        assert!(BuiltinType::Decimal.coerce(Value::Float64(f64::NAN)).is_err());
        assert_eq!(
            BuiltinType::Decimal.coerce(Value::Float64(2.5)),
            Ok(Value::Decimal("2.5".to_string()))
        );
    }

    #[test]
    fn test_coerce_f32_rejects_overflow() {
        assert_eq!(
            BuiltinType::F32.coerce(Value::Float64(1.5)),
            Ok(Value::Float32(1.5))
        );

        let err = BuiltinType::F32.coerce(Value::Float64(1e300)).unwrap_err();
        assert_eq!(err.target, BuiltinType::F32);
        assert!(BuiltinType::F32.coerce(Value::Float64(-1e300)).is_err());
    }

    #[test]
    fn test_coerce_null_passes_through() {
        for builtin in BuiltinType::ALL {
            assert_eq!(builtin.coerce(Value::Null), Ok(Value::Null));
        }
    }
}
