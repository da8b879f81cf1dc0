//! Instance synthesis engine for fixture-synth.
//!
//! This crate provides the [`Synthesizer`], which builds a well-formed
//! instance of any described type. Type shapes come from a [`TypeMetadata`]
//! implementation (usually a [`synth_core::TypeRegistry`] loaded from YAML);
//! leaf values and enumeration choices come from a [`GeneratorPolicy`].
//!
//! # Architecture
//!
//! ```text
//!   TypeMetadata          GeneratorPolicy
//!        │                       │
//!        ▼                       ▼
//! ┌──────────────────────────────────────┐
//! │             Synthesizer              │
//! │                                      │
//! │  classify ──► composite ──► resolver │
//! │     │         enumeration     │      │
//! │     │         leaf            │      │
//! │     │         zero-arg        │      │
//! │     └──────────◄──────────────┘      │
//! └──────────────────┬───────────────────┘
//!                    │
//!                    ▼
//!     Value (Record / Enum / leaf value)
//! ```
//!
//! # Example
//!
//! ```rust
//! use synth_core::{TypeName, TypeRegistry};
//! use synth_engine::{policies, Synthesizer};
//!
//! let registry = TypeRegistry::from_yaml(r#"
//! version: 1
//! types:
//!   - name: Pair
//!     kind: composite
//!     fields:
//!       - { name: a, type: string }
//!       - { name: b, type: string, nullable: true }
//!       - { name: c, type: string, default: "x" }
//! "#).unwrap();
//!
//! let policy = policies::minimal();
//! let synthesizer = Synthesizer::new(&registry, &policy);
//! let value = synthesizer.synthesize(&TypeName::from("Pair")).unwrap();
//!
//! let pair = value.as_record().unwrap();
//! assert_eq!(pair.get("a").and_then(|v| v.as_str()), Some("_"));
//! assert!(pair.get("b").unwrap().is_null());
//! assert_eq!(pair.get("c").and_then(|v| v.as_str()), Some("x"));
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod generators;
pub mod policies;
pub mod policy;
mod resolver;

pub use config::{BasePolicy, LeafGeneratorConfig, PolicyConfig, PolicyConfigError};
pub use dispatcher::{classify, synthesize, CycleGuard, Instances, Synthesizer};
pub use error::{GeneratorError, SynthesisError};
pub use policy::{shared_rng, EnumSelector, GeneratorPolicy, LeafGenerator, PolicyBuilder, SharedRng};
pub use synth_core::{TypeCategory, TypeMetadata, TypeName, Value};
