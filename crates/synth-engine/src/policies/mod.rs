//! Built-in generator policies.
//!
//! Both policies register a leaf generator for every [`BuiltinType`] and map
//! container types to their empty value.
//!
//! [`BuiltinType`]: synth_core::BuiltinType

mod minimal;
mod random;

pub use minimal::{minimal, minimal_value};
pub use random::{random, random_uuid, random_value, random_with_rng, seeded_random};
