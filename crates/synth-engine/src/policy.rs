//! The generator policy contract.
//!
//! A [`GeneratorPolicy`] decides what leaf and enumeration values look like.
//! It never decides how types are classified or decomposed; that is the
//! engine's job.

use crate::error::GeneratorError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use synth_core::{TypeName, Value};

type LeafFn = dyn Fn() -> Result<Value, GeneratorError> + Send + Sync;
type SelectFn = dyn for<'a> Fn(&'a [Value]) -> &'a Value + Send + Sync;

/// Random source shared by the generators of one policy.
pub type SharedRng = Arc<Mutex<StdRng>>;

/// Create a shared RNG, seeded for reproducibility or from OS entropy.
pub fn shared_rng(seed: Option<u64>) -> SharedRng {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    Arc::new(Mutex::new(rng))
}

/// Run `f` with exclusive access to the shared RNG.
///
/// A poisoned lock still holds a usable RNG, so poisoning is ignored.
pub fn with_rng<T>(rng: &SharedRng, f: impl FnOnce(&mut StdRng) -> T) -> T {
    let mut guard = rng.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

/// Zero-argument producer of a leaf value.
#[derive(Clone)]
pub struct LeafGenerator(Arc<LeafFn>);

impl LeafGenerator {
    /// Wrap a generator function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Result<Value, GeneratorError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Generator that always yields a clone of `value`.
    pub fn constant(value: Value) -> Self {
        Self::new(move || Ok(value.clone()))
    }

    /// Produce one value.
    pub fn generate(&self) -> Result<Value, GeneratorError> {
        (self.0)()
    }
}

impl fmt::Debug for LeafGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LeafGenerator(..)")
    }
}

/// Picks one value out of an enumeration's non-empty value list.
#[derive(Clone)]
pub struct EnumSelector(Arc<SelectFn>);

impl EnumSelector {
    /// Wrap a selection function. It is only ever called with a non-empty slice.
    pub fn new<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a [Value]) -> &'a Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Always pick the first declared value.
    pub fn first() -> Self {
        Self::new(|values: &[Value]| &values[0])
    }

    /// Pick uniformly at random.
    pub fn uniform(rng: SharedRng) -> Self {
        Self::new(move |values: &[Value]| {
            let idx = with_rng(&rng, |rng| rng.random_range(0..values.len()));
            &values[idx]
        })
    }

    /// Select one of `values`, which must be non-empty.
    pub fn select<'a>(&self, values: &'a [Value]) -> &'a Value {
        (self.0)(values)
    }
}

impl fmt::Debug for EnumSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EnumSelector(..)")
    }
}

/// Leaf generators plus enumeration selection, immutable once built.
///
/// Cloning is cheap; clones share generator state (e.g. a seeded RNG).
#[derive(Clone)]
pub struct GeneratorPolicy {
    name: String,
    leaf_generators: HashMap<TypeName, LeafGenerator>,
    enum_selector: EnumSelector,
}

impl GeneratorPolicy {
    /// Start building a policy.
    pub fn builder(name: impl Into<String>) -> PolicyBuilder {
        PolicyBuilder {
            name: name.into(),
            leaf_generators: HashMap::new(),
            enum_selector: None,
        }
    }

    /// Start a builder pre-filled with this policy's configuration.
    pub fn to_builder(&self) -> PolicyBuilder {
        PolicyBuilder {
            name: self.name.clone(),
            leaf_generators: self.leaf_generators.clone(),
            enum_selector: Some(self.enum_selector.clone()),
        }
    }

    /// Policy name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Generator registered for exactly this type.
    pub fn leaf_generator(&self, type_name: &TypeName) -> Option<&LeafGenerator> {
        self.leaf_generators.get(type_name)
    }

    /// Whether a generator is registered for this type.
    pub fn has_leaf(&self, type_name: &TypeName) -> bool {
        self.leaf_generators.contains_key(type_name)
    }

    /// Registered leaf types, sorted by name.
    pub fn leaf_types(&self) -> Vec<&TypeName> {
        let mut names: Vec<_> = self.leaf_generators.keys().collect();
        names.sort();
        names
    }

    /// Select one value of a non-empty enumeration.
    pub fn select_enum<'a>(&self, values: &'a [Value]) -> &'a Value {
        self.enum_selector.select(values)
    }
}

impl fmt::Debug for GeneratorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorPolicy")
            .field("name", &self.name)
            .field("leaf_types", &self.leaf_types())
            .finish()
    }
}

/// Builder for [`GeneratorPolicy`].
pub struct PolicyBuilder {
    name: String,
    leaf_generators: HashMap<TypeName, LeafGenerator>,
    enum_selector: Option<EnumSelector>,
}

impl PolicyBuilder {
    /// Register a leaf generator, replacing any earlier one for the same type.
    pub fn leaf(mut self, type_name: impl Into<TypeName>, generator: LeafGenerator) -> Self {
        self.leaf_generators.insert(type_name.into(), generator);
        self
    }

    /// Register a leaf generator function.
    pub fn leaf_fn<F>(self, type_name: impl Into<TypeName>, f: F) -> Self
    where
        F: Fn() -> Result<Value, GeneratorError> + Send + Sync + 'static,
    {
        self.leaf(type_name, LeafGenerator::new(f))
    }

    /// Set the enumeration selector. Defaults to [`EnumSelector::first`].
    pub fn enum_selector(mut self, selector: EnumSelector) -> Self {
        self.enum_selector = Some(selector);
        self
    }

    /// Rename the policy.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Build the policy.
    pub fn build(self) -> GeneratorPolicy {
        GeneratorPolicy {
            name: self.name,
            leaf_generators: self.leaf_generators,
            enum_selector: self.enum_selector.unwrap_or_else(EnumSelector::first),
        }
    }
}
