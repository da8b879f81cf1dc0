//! YAML policy configuration.
//!
//! A policy file picks a base policy and overrides or adds leaf generators
//! per type name:
//!
//! ```yaml
//! base: random
//! seed: 42
//! leaves:
//!   i32:
//!     type: int_range
//!     min: 18
//!     max: 80
//!   Email:
//!     type: pattern
//!     pattern: "user_{index}@example.com"
//! ```

use crate::generators::build_leaf_generator;
use crate::policies;
use crate::policy::{shared_rng, GeneratorPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use synth_core::{CoercionError, TypeName};

/// Error type for policy configuration.
#[derive(Debug, thiserror::Error)]
pub enum PolicyConfigError {
    /// Error reading policy file
    #[error("Failed to read policy file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Range with min above max or non-finite bounds
    #[error("Invalid range for '{type_name}': min {min} is not below or equal to max {max}")]
    InvalidRange {
        type_name: String,
        min: String,
        max: String,
    },

    /// Unparseable timestamp bound
    #[error("Invalid timestamp for '{type_name}': {value}")]
    InvalidTimestamp { type_name: String, value: String },

    /// Probability outside 0.0..=1.0
    #[error("Invalid true_weight for '{type_name}': {weight} is not within 0.0..=1.0")]
    InvalidWeight { type_name: String, weight: f64 },

    /// `one_of` without values
    #[error("one_of generator for '{type_name}' has no values")]
    EmptyOneOf { type_name: String },

    /// Container types are always synthesized empty
    #[error("Container type '{type_name}' can only be configured with an empty static value")]
    NonEmptyContainer { type_name: String },

    /// Static or one_of value does not fit the builtin type
    #[error("Invalid value for '{type_name}': {source}")]
    InvalidValue {
        type_name: String,
        #[source]
        source: CoercionError,
    },
}

/// Policy the overrides are layered on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasePolicy {
    /// Deterministic zero values, first enum value
    #[default]
    Minimal,
    /// Random values, uniformly chosen enum value
    Random,
}

/// Generator configuration for one leaf type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LeafGeneratorConfig {
    /// Generate UUIDs (v4)
    UuidV4,

    /// Generate sequential integers
    Sequential {
        /// Starting value
        #[serde(default)]
        start: i64,
    },

    /// Generate values using a pattern with placeholders
    Pattern {
        /// Pattern string (supports {index}, {uuid}, {rand:N})
        pattern: String,
    },

    /// Generate random integers in a range
    IntRange {
        /// Minimum value (inclusive)
        min: i64,
        /// Maximum value (inclusive)
        max: i64,
    },

    /// Generate random floats in a range
    FloatRange {
        /// Minimum value (inclusive)
        min: f64,
        /// Maximum value (inclusive)
        max: f64,
    },

    /// Generate random decimals in a range
    DecimalRange {
        /// Minimum value (inclusive)
        min: f64,
        /// Maximum value (inclusive)
        max: f64,
    },

    /// Generate timestamps in a range
    TimestampRange {
        /// Start timestamp (ISO 8601 or YYYY-MM-DD)
        start: String,
        /// End timestamp (ISO 8601 or YYYY-MM-DD)
        end: String,
    },

    /// Generate the current timestamp at generation time
    ///
    /// Note: This is NOT deterministic.
    TimestampNow,

    /// Generate weighted boolean values
    WeightedBool {
        /// Weight for true value (0.0 to 1.0)
        true_weight: f64,
    },

    /// Generate random selection from a pool of values
    OneOf {
        /// Pool of values to select from
        values: Vec<serde_yaml::Value>,
    },

    /// Generate a static value
    Static {
        /// The static value to use
        value: serde_yaml::Value,
    },

    /// Generate null values
    Null,

    /// Generate random durations in a range (in seconds)
    DurationRange {
        /// Minimum duration in seconds (inclusive)
        min_secs: u64,
        /// Maximum duration in seconds (inclusive)
        max_secs: u64,
    },
}

/// Policy configuration loaded from YAML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Base policy
    #[serde(default)]
    pub base: BasePolicy,

    /// Seed for every random draw of the built policy; OS entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,

    /// Leaf generator overrides keyed by type name
    #[serde(default)]
    pub leaves: BTreeMap<TypeName, LeafGeneratorConfig>,
}

impl PolicyConfig {
    /// Configuration for a bare base policy.
    pub fn new(base: BasePolicy, seed: Option<u64>) -> Self {
        Self {
            base,
            seed,
            leaves: BTreeMap::new(),
        }
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PolicyConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, PolicyConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Build the configured policy.
    ///
    /// All random generators of the result, base and overrides alike, draw
    /// from one RNG seeded with `seed`.
    pub fn build(&self) -> Result<GeneratorPolicy, PolicyConfigError> {
        let rng = shared_rng(self.seed);
        let base = match self.base {
            BasePolicy::Minimal => policies::minimal(),
            BasePolicy::Random => policies::random_with_rng(rng.clone()),
        };

        let mut builder = base.to_builder();
        for (type_name, config) in &self.leaves {
            builder = builder.leaf(type_name.clone(), build_leaf_generator(type_name, config, &rng)?);
        }

        tracing::debug!(
            base = ?self.base,
            overrides = self.leaves.len(),
            seeded = self.seed.is_some(),
            "built policy from configuration"
        );
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use synth_core::Value;

    #[test]
    fn test_parse_policy_config() {
        let yaml = r#"
base: random
seed: 7
leaves:
  i32: { type: int_range, min: 1, max: 3 }
  Email: { type: pattern, pattern: "user_{index}@example.com" }
  Token: { type: uuid_v4 }
  Flag: { type: weighted_bool, true_weight: 0.5 }
  Missing: { type: "null" }
"#;
        let config = PolicyConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.base, BasePolicy::Random);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.leaves.len(), 5);
        assert!(matches!(
            config.leaves.get(&TypeName::from("i32")),
            Some(LeafGeneratorConfig::IntRange { min: 1, max: 3 })
        ));
    }

    #[test]
    fn test_defaults_to_minimal() {
        let config = PolicyConfig::from_yaml("{}").unwrap();
        assert_eq!(config.base, BasePolicy::Minimal);
        assert!(config.seed.is_none());

        let policy = config.build().unwrap();
        assert_eq!(policy.name(), "minimal");
    }

    #[test]
    fn test_build_applies_overrides() {
        let yaml = r#"
leaves:
  string: { type: static, value: "fixed" }
  Email: { type: pattern, pattern: "user_{index}@example.com" }
"#;
        let policy = PolicyConfig::from_yaml(yaml).unwrap().build().unwrap();

        let string = policy.leaf_generator(&TypeName::from("string")).unwrap();
        assert_eq!(string.generate(), Ok(Value::from("fixed")));

        let email = policy.leaf_generator(&TypeName::from("Email")).unwrap();
        assert_eq!(email.generate(), Ok(Value::from("user_0@example.com")));
        assert_eq!(email.generate(), Ok(Value::from("user_1@example.com")));

        // Untouched builtins keep the base generator
        let flag = policy.leaf_generator(&TypeName::from("bool")).unwrap();
        assert_eq!(flag.generate(), Ok(Value::Bool(false)));
    }

    #[test]
    fn test_seeded_build_is_reproducible() {
        let yaml = r#"
base: random
seed: 42
leaves:
  Age: { type: int_range, min: 0, max: 1000000 }
"#;
        let config = PolicyConfig::from_yaml(yaml).unwrap();
        let draw = |policy: &GeneratorPolicy| -> Vec<Value> {
            ["Age", "string", "i64", "uuid"]
                .iter()
                .map(|t| policy.leaf_generator(&TypeName::from(*t)).unwrap().generate().unwrap())
                .collect()
        };

        assert_eq!(draw(&config.build().unwrap()), draw(&config.build().unwrap()));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"base: random\nseed: 1\n").unwrap();

        let config = PolicyConfig::from_file(file.path()).unwrap();
        assert_eq!(config.base, BasePolicy::Random);

        let err = PolicyConfig::from_file("/nonexistent/policy.yaml").unwrap_err();
        assert!(matches!(err, PolicyConfigError::IoError(_)));
    }

    #[test]
    fn test_unknown_generator_type() {
        let err = PolicyConfig::from_yaml("leaves:\n  i32: { type: gaussian }\n").unwrap_err();
        assert!(matches!(err, PolicyConfigError::YamlError(_)));
    }
}
