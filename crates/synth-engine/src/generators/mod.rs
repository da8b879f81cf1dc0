//! Configurable leaf value generators.
//!
//! Turns a [`LeafGeneratorConfig`] into a [`LeafGenerator`]. When the
//! configured type name is a builtin, every produced value is conformed to
//! that builtin's representation (integers narrowed, timestamps truncated to
//! dates, YAML scalars coerced).

pub mod numeric;
pub mod pattern;
pub mod timestamp;

use crate::config::{LeafGeneratorConfig, PolicyConfigError};
use crate::error::GeneratorError;
use crate::policies::random_uuid;
use crate::policy::{with_rng, LeafGenerator, SharedRng};
use chrono::TimeDelta;
use numeric::{format_decimal, Bounds};
use rand::Rng;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use synth_core::{BuiltinType, TypeName, Value};

/// Fractional digits of generated decimals.
const DECIMAL_SCALE: usize = 2;

/// Build the leaf generator described by `config` for `type_name`.
///
/// Random generators draw from `rng`. Invalid configurations (empty ranges,
/// unparseable timestamps, static values that do not fit the builtin type)
/// are rejected here, not at generation time.
pub fn build_leaf_generator(
    type_name: &TypeName,
    config: &LeafGeneratorConfig,
    rng: &SharedRng,
) -> Result<LeafGenerator, PolicyConfigError> {
    let target = type_name.builtin();

    if target.is_some_and(|b| b.is_container()) && !is_empty_container_config(config) {
        return Err(PolicyConfigError::NonEmptyContainer {
            type_name: type_name.to_string(),
        });
    }

    let rng = rng.clone();
    let generator = match config {
        LeafGeneratorConfig::UuidV4 => LeafGenerator::new(move || {
            let uuid = with_rng(&rng, |rng| random_uuid(rng));
            conform(target, Value::Uuid(uuid))
        }),

        LeafGeneratorConfig::Sequential { start } => {
            let start = *start;
            let counter = AtomicU64::new(0);
            LeafGenerator::new(move || {
                let index = counter.fetch_add(1, Ordering::Relaxed);
                let value = i64::try_from(index)
                    .ok()
                    .and_then(|index| start.checked_add(index))
                    .ok_or_else(|| {
                        GeneratorError::Failed(format!("sequence starting at {start} overflowed"))
                    })?;
                conform(target, Value::Int64(value))
            })
        }

        LeafGeneratorConfig::Pattern { pattern } => {
            let pattern = pattern.clone();
            let counter = AtomicU64::new(0);
            LeafGenerator::new(move || {
                let index = counter.fetch_add(1, Ordering::Relaxed);
                let text = with_rng(&rng, |rng| pattern::generate_pattern(&pattern, rng, index));
                conform(target, Value::String(text))
            })
        }

        LeafGeneratorConfig::IntRange { min, max } => {
            let bounds = checked_bounds(type_name, *min, *max, Bounds::new(*min, *max))?;
            LeafGenerator::new(move || {
                let value = with_rng(&rng, |rng| bounds.sample(rng));
                conform(target, Value::Int64(value))
            })
        }

        LeafGeneratorConfig::FloatRange { min, max } => {
            let bounds = checked_bounds(type_name, *min, *max, Bounds::finite(*min, *max))?;
            LeafGenerator::new(move || {
                let value = with_rng(&rng, |rng| bounds.sample(rng));
                conform(target, Value::Float64(value))
            })
        }

        LeafGeneratorConfig::DecimalRange { min, max } => {
            let bounds = checked_bounds(type_name, *min, *max, Bounds::finite(*min, *max))?;
            LeafGenerator::new(move || {
                let value = with_rng(&rng, |rng| bounds.sample(rng));
                conform(target, Value::Decimal(format_decimal(value, DECIMAL_SCALE)))
            })
        }

        LeafGeneratorConfig::TimestampRange { start, end } => {
            let parse = |value: &str| {
                timestamp::parse_timestamp(value).ok_or_else(|| PolicyConfigError::InvalidTimestamp {
                    type_name: type_name.to_string(),
                    value: value.to_string(),
                })
            };
            let (start, end) = (parse(start)?, parse(end)?);
            let bounds = checked_bounds(type_name, start, end, Bounds::new(start, end))?;
            LeafGenerator::new(move || {
                let ts = with_rng(&rng, |rng| {
                    timestamp::generate_timestamp_range(rng, bounds.min(), bounds.max())
                });
                conform(target, Value::DateTime(ts))
            })
        }

        LeafGeneratorConfig::TimestampNow => {
            LeafGenerator::new(move || conform(target, Value::DateTime(timestamp::generate_timestamp_now())))
        }

        LeafGeneratorConfig::WeightedBool { true_weight } => {
            if !(0.0..=1.0).contains(true_weight) {
                return Err(PolicyConfigError::InvalidWeight {
                    type_name: type_name.to_string(),
                    weight: *true_weight,
                });
            }
            let weight = *true_weight;
            LeafGenerator::new(move || {
                let flag = with_rng(&rng, |rng| rng.random_bool(weight));
                conform(target, Value::Bool(flag))
            })
        }

        LeafGeneratorConfig::OneOf { values } => {
            if values.is_empty() {
                return Err(PolicyConfigError::EmptyOneOf {
                    type_name: type_name.to_string(),
                });
            }
            let pool = values
                .iter()
                .map(|v| static_value(type_name, target, v))
                .collect::<Result<Vec<_>, _>>()?;
            LeafGenerator::new(move || {
                let idx = with_rng(&rng, |rng| rng.random_range(0..pool.len()));
                Ok(pool[idx].clone())
            })
        }

        LeafGeneratorConfig::Static { value } => {
            LeafGenerator::constant(static_value(type_name, target, value)?)
        }

        LeafGeneratorConfig::Null => LeafGenerator::constant(Value::Null),

        LeafGeneratorConfig::DurationRange { min_secs, max_secs } => {
            let bounds = checked_bounds(type_name, *min_secs, *max_secs, Bounds::new(*min_secs, *max_secs))?;
            LeafGenerator::new(move || {
                let secs = with_rng(&rng, |rng| bounds.sample(rng));
                let duration = i64::try_from(secs)
                    .ok()
                    .and_then(TimeDelta::try_seconds)
                    .ok_or_else(|| GeneratorError::Failed(format!("{secs}s is not a valid duration")))?;
                conform(target, Value::Duration(duration))
            })
        }
    };

    tracing::trace!(type_name = %type_name, ?config, "built leaf generator");
    Ok(generator)
}

/// Conform a generated value to the builtin type it was registered for.
///
/// Values for non-builtin type names pass through unchanged.
pub fn conform(target: Option<BuiltinType>, value: Value) -> Result<Value, GeneratorError> {
    let Some(target) = target else {
        return Ok(value);
    };

    if target.is_integer() {
        if let Some(i) = value.as_integer() {
            return target
                .narrow_integer(i)
                .ok_or(GeneratorError::OutOfRange { target, value: i });
        }
    }

    let value = match (target, value) {
        (BuiltinType::Date, Value::DateTime(dt)) => Value::Date(dt.date_naive()),
        (BuiltinType::LocalDateTime, Value::DateTime(dt)) => Value::LocalDateTime(dt.naive_utc()),
        (_, value) => value,
    };

    target.coerce(value).map_err(|e| GeneratorError::Mismatch {
        target: e.target,
        found: e.found,
    })
}

fn static_value(
    type_name: &TypeName,
    target: Option<BuiltinType>,
    yaml: &serde_yaml::Value,
) -> Result<Value, PolicyConfigError> {
    let value = Value::from_yaml(yaml);
    match target {
        Some(builtin) => builtin
            .coerce(value)
            .map_err(|source| PolicyConfigError::InvalidValue {
                type_name: type_name.to_string(),
                source,
            }),
        None => Ok(value),
    }
}

fn is_empty_container_config(config: &LeafGeneratorConfig) -> bool {
    match config {
        LeafGeneratorConfig::Null => true,
        LeafGeneratorConfig::Static { value } => {
            let value = Value::from_yaml(value);
            value.is_null() || value.container_len() == Some(0)
        }
        _ => false,
    }
}

fn checked_bounds<T: Display>(
    type_name: &TypeName,
    min: T,
    max: T,
    bounds: Option<Bounds<T>>,
) -> Result<Bounds<T>, PolicyConfigError> {
    bounds.ok_or_else(|| PolicyConfigError::InvalidRange {
        type_name: type_name.to_string(),
        min: min.to_string(),
        max: max.to_string(),
    })
}
