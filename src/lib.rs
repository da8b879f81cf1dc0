//! Fixture-synth Library
//!
//! Synthesizes well-formed instances of types described in a YAML schema,
//! for use as test fixtures.
//!
//! # Features
//!
//! - Minimal instances: zero values, first enumeration value
//! - Random instances: seeded or entropy-backed random values
//! - Custom policies: per-type leaf generators configured in YAML
//! - Classification: report how a type would be synthesized
//!
//! # Crates
//!
//! - `synth_core` - type names, descriptors, values and the YAML schema
//! - `synth_engine` - classification, composite resolution and policies
//! - `synth_json` - JSON rendering and typed deserialization
//!
//! # CLI Usage
//!
//! ```bash
//! # Minimal instance of a type
//! fixture-synth minimal --schema types.yaml --type User
//!
//! # Ten reproducible random instances
//! fixture-synth random --schema types.yaml --type User --seed 42 --count 10
//!
//! # Instances drawn from a configured policy
//! fixture-synth generate --schema types.yaml --type User --policy policy.yaml
//! ```

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use synth_core::{TypeCategory, TypeName, TypeRegistry};
use synth_engine::{BasePolicy, CycleGuard, GeneratorPolicy, PolicyConfig, Synthesizer};

/// Which types to load and which one to synthesize.
#[derive(Parser, Clone, Debug)]
pub struct TypeOpts {
    /// YAML schema describing the available types
    #[arg(long, value_name = "PATH", env = "FIXTURE_SYNTH_SCHEMA")]
    pub schema: PathBuf,

    /// Name of the type to synthesize
    #[arg(long = "type", value_name = "NAME")]
    pub type_name: String,
}

/// How instances are produced and printed.
#[derive(Parser, Clone, Debug)]
pub struct OutputOpts {
    /// Number of instances to synthesize
    #[arg(long, default_value = "1")]
    pub count: u64,

    /// Recursion guard for composite types
    #[arg(long, value_enum, default_value = "in-progress")]
    pub cycle_guard: CycleGuardArg,

    /// Pretty-print each JSON document
    #[arg(long)]
    pub pretty: bool,
}

/// Command-line spelling of [`CycleGuard`].
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleGuardArg {
    /// Reject any re-entry into a composite type on the current path
    InProgress,
    /// Reject only fields whose type is the enclosing type itself
    SelfReference,
}

impl From<CycleGuardArg> for CycleGuard {
    fn from(arg: CycleGuardArg) -> Self {
        match arg {
            CycleGuardArg::InProgress => CycleGuard::InProgress,
            CycleGuardArg::SelfReference => CycleGuard::SelfReference,
        }
    }
}

/// Built-in policy selection.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyKind {
    Minimal,
    Random,
}

impl From<PolicyKind> for BasePolicy {
    fn from(kind: PolicyKind) -> Self {
        match kind {
            PolicyKind::Minimal => BasePolicy::Minimal,
            PolicyKind::Random => BasePolicy::Random,
        }
    }
}

/// Load the type registry from a schema file.
pub fn load_registry(path: &Path) -> anyhow::Result<TypeRegistry> {
    TypeRegistry::from_file(path).with_context(|| format!("Failed to load schema from {path:?}"))
}

/// Build one of the built-in policies. `seed` only affects the random policy.
pub fn build_policy(kind: PolicyKind, seed: Option<u64>) -> anyhow::Result<GeneratorPolicy> {
    PolicyConfig::new(kind.into(), seed)
        .build()
        .context("Invalid policy configuration")
}

/// Load a policy configured in a YAML file.
pub fn load_policy(path: &Path) -> anyhow::Result<GeneratorPolicy> {
    PolicyConfig::from_file(path)
        .with_context(|| format!("Failed to load policy from {path:?}"))?
        .build()
        .context("Invalid policy configuration")
}

/// Synthesize `output.count` instances and write one JSON document per
/// instance to `out`. Returns the number of instances written.
///
/// Stops at the first failing instance.
pub fn run_synthesis<W: Write>(
    types: &TypeOpts,
    output: &OutputOpts,
    policy: &GeneratorPolicy,
    out: &mut W,
) -> anyhow::Result<u64> {
    let registry = load_registry(&types.schema)?;
    let type_name = TypeName::from(types.type_name.as_str());
    let synthesizer =
        Synthesizer::new(&registry, policy).with_cycle_guard(output.cycle_guard.into());

    tracing::info!(
        type_name = %type_name,
        policy = policy.name(),
        count = output.count,
        "Synthesizing instances"
    );

    let mut written = 0;
    for (index, instance) in synthesizer.instances(&type_name, output.count).enumerate() {
        let value = instance
            .with_context(|| format!("Failed to synthesize instance {index} of {type_name}"))?;
        let rendered = synth_json::to_json_string(&value, output.pretty)
            .with_context(|| format!("Failed to render instance {index} of {type_name}"))?;
        writeln!(out, "{rendered}").context("Failed to write output")?;
        written += 1;
    }

    Ok(written)
}

/// Classify the type named in `types` under a built-in policy.
pub fn classify_type(types: &TypeOpts, kind: PolicyKind) -> anyhow::Result<TypeCategory> {
    let registry = load_registry(&types.schema)?;
    let policy = build_policy(kind, None)?;
    Ok(synth_engine::classify(
        &registry,
        &policy,
        &TypeName::from(types.type_name.as_str()),
    ))
}
