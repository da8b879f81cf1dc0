//! Random-value policy backed by a shared, optionally seeded [`StdRng`].
//!
//! [`StdRng`]: rand::rngs::StdRng

use crate::policy::{shared_rng, with_rng, EnumSelector, GeneratorPolicy, SharedRng};
use chrono::{DateTime, NaiveTime, TimeDelta};
use rand::distr::Alphanumeric;
use rand::Rng;
use synth_core::{BuiltinType, Value};
use uuid::{Builder, Uuid};

/// Seconds from the epoch to 2100-01-01T00:00:00Z.
const MAX_TIMESTAMP_SECS: i64 = 4_102_444_800;
const MAX_TEXT_LEN: usize = 32;
const FLOAT_BOUND: f64 = 1_000_000.0;
const SECS_PER_DAY: u32 = 86_400;

/// Random policy seeded from OS entropy.
pub fn random() -> GeneratorPolicy {
    random_with_rng(shared_rng(None))
}

/// Random policy whose draws are reproducible for a given seed.
pub fn seeded_random(seed: u64) -> GeneratorPolicy {
    random_with_rng(shared_rng(Some(seed)))
}

/// Random policy drawing every value, enum selections included, from `rng`.
pub fn random_with_rng(rng: SharedRng) -> GeneratorPolicy {
    BuiltinType::ALL
        .iter()
        .fold(GeneratorPolicy::builder("random"), |builder, builtin| {
            let builtin = *builtin;
            let rng = rng.clone();
            builder.leaf_fn(builtin, move || {
                Ok(with_rng(&rng, |rng| random_value(builtin, rng)))
            })
        })
        .enum_selector(EnumSelector::uniform(rng))
        .build()
}

/// Draw one random value of `builtin`. Containers are always empty.
pub fn random_value<R: Rng>(builtin: BuiltinType, rng: &mut R) -> Value {
    match builtin {
        BuiltinType::Bool => Value::Bool(rng.random()),
        BuiltinType::I8 => Value::Int8(rng.random()),
        BuiltinType::I16 => Value::Int16(rng.random()),
        BuiltinType::I32 => Value::Int32(rng.random()),
        BuiltinType::I64 => Value::Int64(rng.random()),
        BuiltinType::U8 => Value::UInt8(rng.random()),
        BuiltinType::U16 => Value::UInt16(rng.random()),
        BuiltinType::U32 => Value::UInt32(rng.random()),
        BuiltinType::U64 => Value::UInt64(rng.random()),
        BuiltinType::F32 => Value::Float32(rng.random_range(-FLOAT_BOUND as f32..FLOAT_BOUND as f32)),
        BuiltinType::F64 => Value::Float64(rng.random_range(-FLOAT_BOUND..FLOAT_BOUND)),
        BuiltinType::Char => Value::Char(char::from(rng.sample(Alphanumeric))),
        BuiltinType::String => {
            let len = rng.random_range(1..=MAX_TEXT_LEN);
            Value::String(
                (0..len)
                    .map(|_| char::from(rng.sample(Alphanumeric)))
                    .collect(),
            )
        }
        BuiltinType::Decimal => {
            let value = rng.random_range(-FLOAT_BOUND..FLOAT_BOUND);
            Value::Decimal(format!("{value:.2}"))
        }
        BuiltinType::Bytes => {
            let mut bytes = vec![0u8; rng.random_range(1..=MAX_TEXT_LEN)];
            rng.fill(&mut bytes[..]);
            Value::Bytes(bytes)
        }
        BuiltinType::Uuid => Value::Uuid(random_uuid(rng)),
        BuiltinType::Date => Value::Date(random_datetime(rng).date_naive()),
        BuiltinType::Time => {
            let secs = rng.random_range(0..SECS_PER_DAY);
            Value::Time(NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap_or_default())
        }
        BuiltinType::DateTime => Value::DateTime(random_datetime(rng)),
        BuiltinType::LocalDateTime => Value::LocalDateTime(random_datetime(rng).naive_utc()),
        BuiltinType::Duration => {
            let secs = rng.random_range(0..i64::from(SECS_PER_DAY) * 365);
            Value::Duration(TimeDelta::try_seconds(secs).unwrap_or_default())
        }
        BuiltinType::List => Value::List(Vec::new()),
        BuiltinType::Set => Value::Set(Vec::new()),
        BuiltinType::Map => Value::Map(Vec::new()),
        BuiltinType::Sequence => Value::Sequence(Vec::new()),
    }
}

/// Version 4 UUID built from the RNG's bytes, so seeded runs repeat.
pub fn random_uuid<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    Builder::from_random_bytes(rng.random()).into_uuid()
}

fn random_datetime<R: Rng>(rng: &mut R) -> DateTime<chrono::Utc> {
    let secs = rng.random_range(0..MAX_TIMESTAMP_SECS);
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}
