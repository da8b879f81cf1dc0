//! Forward conversion: Value → JSON value.
//!
//! This module provides conversion from synth-core's `Value` to JSON values.

use crate::typed::JsonError;
use base64::Engine;
use serde_json::json;
use synth_core::Value;

/// Wrapper for JSON values.
#[derive(Debug, Clone)]
pub struct JsonValue(pub serde_json::Value);

impl JsonValue {
    /// Get the inner JSON value.
    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }

    /// Get a reference to the inner JSON value.
    pub fn as_inner(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        JsonValue(value_to_json(&value))
    }
}

/// Convert a Value to a JSON value.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => json!(*b),

        Value::Int8(i) => json!(*i),
        Value::Int16(i) => json!(*i),
        Value::Int32(i) => json!(*i),
        Value::Int64(i) => json!(*i),
        Value::UInt8(i) => json!(*i),
        Value::UInt16(i) => json!(*i),
        Value::UInt32(i) => json!(*i),
        Value::UInt64(i) => json!(*i),

        // Non-finite floats become null
        Value::Float32(f) => json!(*f),
        Value::Float64(f) => json!(*f),

        Value::Char(c) => json!(c.to_string()),
        Value::String(s) => json!(s),

        // Decimal - store as string to preserve precision
        Value::Decimal(d) => json!(d),

        // Binary - base64 encode
        Value::Bytes(b) => json!(base64::engine::general_purpose::STANDARD.encode(b)),

        Value::Uuid(u) => json!(u.to_string()),

        // Date/time types - ISO 8601 format
        Value::Date(d) => json!(d.format("%Y-%m-%d").to_string()),
        Value::Time(t) => json!(t.format("%H:%M:%S%.f").to_string()),
        Value::DateTime(dt) => json!(dt.format("%Y-%m-%dT%H:%M:%S%.fZ").to_string()),
        Value::LocalDateTime(dt) => json!(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
        Value::Duration(d) => json!(d.to_string()),

        Value::List(items) | Value::Set(items) | Value::Sequence(items) => {
            json!(items.iter().map(value_to_json).collect::<Vec<_>>())
        }
        Value::Map(entries) => {
            let mut obj = serde_json::Map::new();
            for (key, value) in entries {
                obj.insert(map_key(key), value_to_json(value));
            }
            serde_json::Value::Object(obj)
        }
        Value::Object(map) => {
            let mut obj = serde_json::Map::new();
            for (key, value) in map {
                obj.insert(key.clone(), value_to_json(value));
            }
            serde_json::Value::Object(obj)
        }

        // Enum - stored as the variant name
        Value::Enum { variant, .. } => json!(variant),

        Value::Record(record) => {
            let mut obj = serde_json::Map::new();
            for (name, value) in &record.fields {
                obj.insert(name.clone(), value_to_json(value));
            }
            serde_json::Value::Object(obj)
        }
    }
}

/// JSON object keys must be strings; other keys use their JSON text.
fn map_key(key: &Value) -> String {
    match value_to_json(key) {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Render a value as a JSON document.
pub fn to_json_string(value: &Value, pretty: bool) -> Result<String, JsonError> {
    let json = value_to_json(value);
    let rendered = if pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
    use synth_core::Record;
    use uuid::Uuid;

    #[test]
    fn test_null_conversion() {
        let json_val: JsonValue = Value::Null.into();
        assert!(json_val.0.is_null());
    }

    #[test]
    fn test_integer_conversion() {
        assert_eq!(value_to_json(&Value::Int8(-8)), json!(-8));
        assert_eq!(value_to_json(&Value::UInt64(u64::MAX)), json!(u64::MAX));
        assert_eq!(value_to_json(&Value::Int64(9876543210)), json!(9876543210i64));
    }

    #[test]
    fn test_float_conversion() {
        let json_val = value_to_json(&Value::Float64(1.23456));
        if let Some(f) = json_val.as_f64() {
            assert!((f - 1.23456).abs() < 0.00001);
        } else {
            panic!("Expected number");
        }

        assert!(value_to_json(&Value::Float64(f64::NAN)).is_null());
    }

    #[test]
    fn test_decimal_conversion() {
        assert_eq!(value_to_json(&Value::Decimal("123.45".to_string())), json!("123.45"));
    }

    #[test]
    fn test_bytes_conversion() {
        let json_val = value_to_json(&Value::Bytes(vec![0x48, 0x65, 0x6c, 0x6c, 0x6f]));
        assert_eq!(json_val, json!("SGVsbG8="));
        assert_eq!(value_to_json(&Value::Bytes(vec![])), json!(""));
    }

    #[test]
    fn test_temporal_conversion() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(value_to_json(&Value::Date(date)), json!("2024-06-15"));

        let time = NaiveTime::from_hms_opt(10, 30, 0).unwrap();
        assert_eq!(value_to_json(&Value::Time(time)), json!("10:30:00"));

        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(value_to_json(&Value::DateTime(dt)), json!("2024-01-15T10:30:00Z"));
        assert_eq!(
            value_to_json(&Value::LocalDateTime(dt.naive_utc())),
            json!("2024-01-15T10:30:00")
        );

        let duration = TimeDelta::try_seconds(90).unwrap();
        assert_eq!(value_to_json(&Value::Duration(duration)), json!("PT90S"));
    }

    #[test]
    fn test_uuid_conversion() {
        let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(
            value_to_json(&Value::Uuid(uuid)),
            json!("550e8400-e29b-41d4-a716-446655440000")
        );
    }

    #[test]
    fn test_containers() {
        assert_eq!(value_to_json(&Value::List(vec![])), json!([]));
        assert_eq!(value_to_json(&Value::Set(vec![Value::from(1)])), json!([1]));
        assert_eq!(
            value_to_json(&Value::Map(vec![
                (Value::from("a"), Value::from(1)),
                (Value::Int32(2), Value::Bool(true)),
            ])),
            json!({ "a": 1, "2": true })
        );
    }

    #[test]
    fn test_enum_and_record() {
        let record = Record::new(
            "Wrapper",
            vec![
                ("color".to_string(), Value::variant("Color", "RED")),
                ("note".to_string(), Value::Null),
                (
                    "pair".to_string(),
                    Value::from(Record::new("Pair", vec![("a".to_string(), Value::from("_"))])),
                ),
            ],
        );

        let json_val: JsonValue = Value::from(record).into();
        assert_eq!(
            json_val.into_inner(),
            json!({ "color": "RED", "note": null, "pair": { "a": "_" } })
        );
    }

    #[test]
    fn test_record_keeps_field_order() {
        let record = Record::new(
            "Event",
            ["zeta", "on", "at", "alpha"]
                .into_iter()
                .map(|name| (name.to_string(), Value::from("_")))
                .collect(),
        );

        assert_eq!(
            to_json_string(&Value::from(record), false).unwrap(),
            r#"{"zeta":"_","on":"_","at":"_","alpha":"_"}"#
        );
    }

    #[test]
    fn test_to_json_string() {
        let value = Value::from(Record::new("Pair", vec![("a".to_string(), Value::from("_"))]));

        assert_eq!(to_json_string(&value, false).unwrap(), r#"{"a":"_"}"#);
        assert!(to_json_string(&value, true).unwrap().contains('\n'));
    }
}
