//! JSON conversions for synthesized values.
//!
//! # Modules
//!
//! - [`forward`] - Value → JSON value conversion
//! - [`typed`] - Value → caller type deserialization
//!
//! # Example
//!
//! ```
//! use serde::Deserialize;
//! use synth_core::{Record, Value};
//! use synth_json::{from_value, JsonValue};
//!
//! #[derive(Deserialize)]
//! struct Pair {
//!     a: String,
//!     b: Option<String>,
//! }
//!
//! let value = Value::from(Record::new(
//!     "Pair",
//!     vec![("a".to_string(), Value::from("_")), ("b".to_string(), Value::Null)],
//! ));
//!
//! // Forward: Value → JSON value
//! let json: JsonValue = value.clone().into();
//! assert_eq!(json.as_inner()["a"], "_");
//!
//! // Typed: Value → Pair
//! let pair: Pair = from_value(value).unwrap();
//! assert_eq!(pair.a, "_");
//! assert!(pair.b.is_none());
//! ```

pub mod forward;
pub mod typed;

pub use forward::{to_json_string, value_to_json, JsonValue};
pub use typed::{from_value, JsonError};
