//! Typed deserialization of synthesized values.

use crate::forward::value_to_json;
use serde::de::DeserializeOwned;
use synth_core::Value;

/// Error type for JSON conversions.
#[derive(Debug, thiserror::Error)]
pub enum JsonError {
    /// Value does not have the shape of the requested type
    #[error("Failed to deserialize {type_name} from synthesized value: {source}")]
    Deserialize {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Error serializing JSON
    #[error("Failed to serialize JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Deserialize a synthesized value into `T`.
///
/// The value goes through its JSON rendering, so records map onto structs,
/// enumeration values onto unit enum variants (by variant name), and
/// temporal values onto anything that parses ISO 8601 strings.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, JsonError> {
    serde_json::from_value(value_to_json(&value)).map_err(|source| JsonError::Deserialize {
        type_name: std::any::type_name::<T>(),
        source,
    })
}
