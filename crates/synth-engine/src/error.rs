//! Error types for synthesis.

use synth_core::{BuiltinType, ConstructionError, TypeName};

/// Error raised by a leaf generator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeneratorError {
    /// Generated integer does not fit the target width
    #[error("generated value {value} does not fit in {target}")]
    OutOfRange { target: BuiltinType, value: i128 },

    /// Generated value cannot represent the target type
    #[error("generated {found} value cannot be used as {target}")]
    Mismatch {
        target: BuiltinType,
        found: &'static str,
    },

    /// Generator-specific failure
    #[error("{0}")]
    Failed(String),
}

/// Error type for synthesis calls.
///
/// Every variant fails the whole synthesis call; nested failures propagate
/// unchanged, so the variant always names the innermost offending type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SynthesisError {
    /// Type is not composite, not an enumeration, has no registered
    /// generator and no zero-argument constructor
    #[error("cannot synthesize instances of {0}")]
    UnsupportedType(TypeName),

    /// Enumeration type without values
    #[error("enumeration {0} has no values to select from")]
    EmptyEnumeration(TypeName),

    /// Required non-nullable parameter re-enters a composite type that is
    /// already being synthesized
    #[error(
        "unbounded recursion: parameter '{parameter}' of {type_name} closes the cycle {}",
        join_cycle(.cycle)
    )]
    UnboundedRecursion {
        type_name: TypeName,
        parameter: String,
        cycle: Vec<TypeName>,
    },

    /// Policy-supplied leaf generator failed
    #[error("leaf generator for {type_name} failed: {source}")]
    LeafGeneratorFailure {
        type_name: TypeName,
        #[source]
        source: GeneratorError,
    },

    /// Type's constructor rejected the assembled arguments
    #[error("constructor of {type_name} failed: {source}")]
    ConstructionFailure {
        type_name: TypeName,
        #[source]
        source: ConstructionError,
    },
}

fn join_cycle(cycle: &[TypeName]) -> String {
    cycle
        .iter()
        .map(TypeName::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
