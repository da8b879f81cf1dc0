//! Command-line interface for fixture-synth
//!
//! # Usage Examples
//!
//! ```bash
//! # One minimal instance
//! fixture-synth minimal --schema types.yaml --type Wrapper
//!
//! # Reproducible random instances, pretty-printed
//! fixture-synth random --schema types.yaml --type User --seed 42 --count 3 --pretty
//!
//! # Instances from a policy file layering leaf generators over a base policy
//! fixture-synth generate --schema types.yaml --type User --policy policy.yaml
//!
//! # How would a type be synthesized?
//! fixture-synth classify --schema types.yaml --type Color --policy-kind random
//! ```
//!
//! Each synthesized instance is written to stdout as one JSON document.
//! Logs go to stderr and are controlled by `RUST_LOG`.

use clap::{Parser, Subcommand};
use fixture_synth::{
    build_policy, classify_type, load_policy, run_synthesis, OutputOpts, PolicyKind, TypeOpts,
};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fixture-synth")]
#[command(about = "Synthesize minimal or random instances of types described in a YAML schema")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize instances with zero values and first enumeration values
    Minimal {
        #[command(flatten)]
        types: TypeOpts,

        #[command(flatten)]
        output: OutputOpts,
    },

    /// Synthesize instances with random values
    Random {
        #[command(flatten)]
        types: TypeOpts,

        #[command(flatten)]
        output: OutputOpts,

        /// Seed for reproducible output (default: OS entropy)
        #[arg(long, env = "FIXTURE_SYNTH_SEED")]
        seed: Option<u64>,
    },

    /// Synthesize instances using a YAML policy configuration
    Generate {
        #[command(flatten)]
        types: TypeOpts,

        #[command(flatten)]
        output: OutputOpts,

        /// Policy configuration file
        #[arg(long, value_name = "PATH")]
        policy: PathBuf,
    },

    /// Print how a type would be synthesized
    Classify {
        #[command(flatten)]
        types: TypeOpts,

        /// Built-in policy to classify against
        #[arg(long, value_enum, default_value = "minimal")]
        policy_kind: PolicyKind,
    },
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for synthesized documents
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Minimal { types, output } => {
            let policy = build_policy(PolicyKind::Minimal, None)?;
            run_synthesis(&types, &output, &policy, &mut out)?;
        }
        Commands::Random {
            types,
            output,
            seed,
        } => {
            let policy = build_policy(PolicyKind::Random, seed)?;
            run_synthesis(&types, &output, &policy, &mut out)?;
        }
        Commands::Generate {
            types,
            output,
            policy,
        } => {
            let policy = load_policy(&policy)?;
            run_synthesis(&types, &output, &policy, &mut out)?;
        }
        Commands::Classify { types, policy_kind } => {
            let category = classify_type(&types, policy_kind)?;
            writeln!(out, "{}: {category}", types.type_name)?;
        }
    }

    Ok(())
}
