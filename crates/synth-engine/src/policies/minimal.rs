//! Deterministic zero-value policy.

use crate::policy::{EnumSelector, GeneratorPolicy, LeafGenerator};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use synth_core::{BuiltinType, Value};
use uuid::Uuid;

/// Policy producing the zero, empty or earliest value of every builtin type
/// and the first value of every enumeration.
pub fn minimal() -> GeneratorPolicy {
    BuiltinType::ALL
        .iter()
        .fold(GeneratorPolicy::builder("minimal"), |builder, builtin| {
            builder.leaf(*builtin, LeafGenerator::constant(minimal_value(*builtin)))
        })
        .enum_selector(EnumSelector::first())
        .build()
}

/// The value [`minimal`] produces for `builtin`.
pub fn minimal_value(builtin: BuiltinType) -> Value {
    match builtin {
        BuiltinType::Bool => Value::Bool(false),
        BuiltinType::I8 => Value::Int8(0),
        BuiltinType::I16 => Value::Int16(0),
        BuiltinType::I32 => Value::Int32(0),
        BuiltinType::I64 => Value::Int64(0),
        BuiltinType::U8 => Value::UInt8(0),
        BuiltinType::U16 => Value::UInt16(0),
        BuiltinType::U32 => Value::UInt32(0),
        BuiltinType::U64 => Value::UInt64(0),
        BuiltinType::F32 => Value::Float32(0.0),
        BuiltinType::F64 => Value::Float64(0.0),
        BuiltinType::Char => Value::Char('\0'),
        // Non-empty so the value is distinguishable from a missing one
        BuiltinType::String => Value::String("_".to_string()),
        BuiltinType::Decimal => Value::Decimal("0".to_string()),
        BuiltinType::Bytes => Value::Bytes(Vec::new()),
        BuiltinType::Uuid => Value::Uuid(Uuid::nil()),
        BuiltinType::Date => Value::Date(NaiveDate::MIN),
        BuiltinType::Time => Value::Time(NaiveTime::MIN),
        BuiltinType::DateTime => Value::DateTime(DateTime::<Utc>::MIN_UTC),
        BuiltinType::LocalDateTime => Value::LocalDateTime(NaiveDateTime::MIN),
        BuiltinType::Duration => Value::Duration(TimeDelta::zero()),
        BuiltinType::List => Value::List(Vec::new()),
        BuiltinType::Set => Value::Set(Vec::new()),
        BuiltinType::Map => Value::Map(Vec::new()),
        BuiltinType::Sequence => Value::Sequence(Vec::new()),
    }
}
