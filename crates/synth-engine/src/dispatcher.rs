//! Type classification and dispatch.
//!
//! Classification order is fixed: composite, enumeration, registered leaf,
//! default-constructible, unsupported. The first match wins, so a composite
//! type is never built through a zero-argument constructor and a type with
//! a structural description is never shadowed by a leaf generator.

use crate::error::SynthesisError;
use crate::policy::{GeneratorPolicy, LeafGenerator};
use synth_core::{
    CompositeShape, TypeCategory, TypeDescriptor, TypeMetadata, TypeName, Value,
    ZeroArgConstructor,
};
use tracing::trace;

/// How the resolver guards against recursive composite types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CycleGuard {
    /// Reject a required non-nullable parameter whose type is the enclosing
    /// composite type itself. Longer cycles (A -> B -> A) are not detected
    /// and recurse until the stack is exhausted.
    SelfReference,

    /// Reject a required non-nullable parameter whose type is any composite
    /// type still being synthesized further up the current path.
    #[default]
    InProgress,
}

/// Synthesis strategy chosen for a type.
enum Strategy<'d> {
    Composite(&'d CompositeShape),
    Enumeration(&'d [Value]),
    Leaf(&'d LeafGenerator),
    ZeroArg(&'d ZeroArgConstructor),
    Unsupported,
}

impl Strategy<'_> {
    fn category(&self) -> TypeCategory {
        match self {
            Self::Composite(_) => TypeCategory::Composite,
            Self::Enumeration(_) => TypeCategory::Enumeration,
            Self::Leaf(_) => TypeCategory::RegisteredLeaf,
            Self::ZeroArg(_) => TypeCategory::DefaultConstructible,
            Self::Unsupported => TypeCategory::Unsupported,
        }
    }
}

fn strategy<'d, M: TypeMetadata + ?Sized>(
    metadata: &'d M,
    policy: &'d GeneratorPolicy,
    ty: &TypeName,
) -> Strategy<'d> {
    let descriptor = metadata.describe(ty);

    if let Some(shape) = descriptor.and_then(TypeDescriptor::as_composite) {
        return Strategy::Composite(shape);
    }
    if let Some(values) = descriptor.and_then(TypeDescriptor::enum_values) {
        return Strategy::Enumeration(values);
    }
    if let Some(generator) = policy.leaf_generator(ty) {
        return Strategy::Leaf(generator);
    }
    if let Some(constructor) = descriptor.and_then(TypeDescriptor::zero_arg_constructor) {
        return Strategy::ZeroArg(constructor);
    }
    Strategy::Unsupported
}

/// Classify a type under a policy.
pub fn classify<M: TypeMetadata + ?Sized>(
    metadata: &M,
    policy: &GeneratorPolicy,
    ty: &TypeName,
) -> TypeCategory {
    strategy(metadata, policy, ty).category()
}

/// Synthesize one instance of `ty` with the default cycle guard.
pub fn synthesize<M: TypeMetadata + ?Sized>(
    metadata: &M,
    ty: &TypeName,
    policy: &GeneratorPolicy,
) -> Result<Value, SynthesisError> {
    Synthesizer::new(metadata, policy).synthesize(ty)
}

/// Synthesizes instances of types described by `metadata` under `policy`.
///
/// A synthesizer holds no mutable state of its own; it can be shared across
/// threads whenever the policy's generators can.
pub struct Synthesizer<'a, M: ?Sized> {
    pub(crate) metadata: &'a M,
    pub(crate) policy: &'a GeneratorPolicy,
    pub(crate) cycle_guard: CycleGuard,
}

impl<'a, M: TypeMetadata + ?Sized> Synthesizer<'a, M> {
    /// Create a synthesizer with the default cycle guard.
    pub fn new(metadata: &'a M, policy: &'a GeneratorPolicy) -> Self {
        Self {
            metadata,
            policy,
            cycle_guard: CycleGuard::default(),
        }
    }

    /// Use a different cycle guard.
    pub fn with_cycle_guard(mut self, cycle_guard: CycleGuard) -> Self {
        self.cycle_guard = cycle_guard;
        self
    }

    /// Active cycle guard.
    pub fn cycle_guard(&self) -> CycleGuard {
        self.cycle_guard
    }

    /// Active policy.
    pub fn policy(&self) -> &GeneratorPolicy {
        self.policy
    }

    /// Classify a type under the active policy.
    pub fn classify(&self, ty: &TypeName) -> TypeCategory {
        classify(self.metadata, self.policy, ty)
    }

    /// Synthesize one instance of `ty`.
    pub fn synthesize(&self, ty: &TypeName) -> Result<Value, SynthesisError> {
        let mut path = Vec::new();
        self.dispatch(ty, &mut path)
    }

    /// Lazily synthesize `count` independent instances of `ty`.
    pub fn instances(&self, ty: &TypeName, count: u64) -> Instances<'_, 'a, M> {
        Instances {
            synthesizer: self,
            type_name: ty.clone(),
            remaining: count,
        }
    }

    /// Whether `ty` is classified as composite.
    pub(crate) fn is_composite(&self, ty: &TypeName) -> bool {
        self.metadata
            .describe(ty)
            .is_some_and(TypeDescriptor::is_composite)
    }

    /// Run exactly one synthesis path for `ty`.
    ///
    /// `path` lists the composite types currently being resolved, outermost
    /// first.
    pub(crate) fn dispatch(
        &self,
        ty: &TypeName,
        path: &mut Vec<TypeName>,
    ) -> Result<Value, SynthesisError> {
        let strategy = strategy(self.metadata, self.policy, ty);
        trace!(type_name = %ty, category = %strategy.category(), depth = path.len(), "classified type");

        match strategy {
            Strategy::Composite(shape) => self.resolve_composite(ty, shape, path),
            Strategy::Enumeration(values) => {
                if values.is_empty() {
                    return Err(SynthesisError::EmptyEnumeration(ty.clone()));
                }
                Ok(self.policy.select_enum(values).clone())
            }
            Strategy::Leaf(generator) => {
                generator
                    .generate()
                    .map_err(|source| SynthesisError::LeafGeneratorFailure {
                        type_name: ty.clone(),
                        source,
                    })
            }
            Strategy::ZeroArg(constructor) => {
                constructor
                    .construct()
                    .map_err(|source| SynthesisError::ConstructionFailure {
                        type_name: ty.clone(),
                        source,
                    })
            }
            Strategy::Unsupported => Err(SynthesisError::UnsupportedType(ty.clone())),
        }
    }
}

/// Iterator over independently synthesized instances.
pub struct Instances<'s, 'a, M: ?Sized> {
    synthesizer: &'s Synthesizer<'a, M>,
    type_name: TypeName,
    remaining: u64,
}

impl<M: TypeMetadata + ?Sized> Iterator for Instances<'_, '_, M> {
    type Item = Result<Value, SynthesisError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;
        Some(self.synthesizer.synthesize(&self.type_name))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeneratorError;
    use crate::policy::{EnumSelector, LeafGenerator};
    use synth_core::{
        CompositeBuilder, ConstructionError, EnumerationShape, TypeDescriptor, TypeRegistry,
        TypeShape, ZeroArgConstructor,
    };

    fn policy() -> GeneratorPolicy {
        GeneratorPolicy::builder("test")
            .leaf("string", LeafGenerator::constant(Value::from("_")))
            .leaf("Color", LeafGenerator::constant(Value::from("leaf")))
            .leaf("Counter", LeafGenerator::constant(Value::Int64(99)))
            .leaf("Pair", LeafGenerator::constant(Value::from("leaf")))
            .leaf_fn("Broken", || Err(GeneratorError::Failed("no entropy".to_string())))
            .enum_selector(EnumSelector::first())
            .build()
    }

    fn registry() -> TypeRegistry {
        TypeRegistry::new()
            .with(CompositeBuilder::new("Pair").field("a", "string").build())
            .unwrap()
            .with(TypeDescriptor::enumeration("Color", ["RED", "GREEN"]))
            .unwrap()
            .with(TypeDescriptor::default_constructible(
                "Counter",
                ZeroArgConstructor::returning(Value::Int64(0)),
            ))
            .unwrap()
            .with(TypeDescriptor::default_constructible(
                "Clock",
                ZeroArgConstructor::returning(Value::Int64(1)),
            ))
            .unwrap()
            .with(TypeDescriptor::default_constructible(
                "Locked",
                ZeroArgConstructor::new(|| Err(ConstructionError::Rejected("locked".to_string()))),
            ))
            .unwrap()
            .with(TypeDescriptor::new(
                "Empty",
                TypeShape::Enumeration(EnumerationShape::new(Vec::new())),
            ))
            .unwrap()
            .with(TypeDescriptor::opaque("Socket"))
            .unwrap()
    }

    #[test]
    fn test_classification_order() {
        let registry = registry();
        let policy = policy();
        let class = |name: &str| classify(&registry, &policy, &TypeName::from(name));

        // Structural descriptions win over leaf generators
        assert_eq!(class("Pair"), TypeCategory::Composite);
        assert_eq!(class("Color"), TypeCategory::Enumeration);
        // Leaf generators win over zero-argument constructors
        assert_eq!(class("Counter"), TypeCategory::RegisteredLeaf);
        assert_eq!(class("string"), TypeCategory::RegisteredLeaf);
        assert_eq!(class("Clock"), TypeCategory::DefaultConstructible);
        assert_eq!(class("Socket"), TypeCategory::Unsupported);
        assert_eq!(class("Unknown"), TypeCategory::Unsupported);
    }

    #[test]
    fn test_dispatch_each_path() {
        let registry = registry();
        let policy = policy();
        let synth = Synthesizer::new(&registry, &policy);

        let pair = synth.synthesize(&TypeName::from("Pair")).unwrap();
        assert_eq!(pair.as_record().unwrap().get("a"), Some(&Value::from("_")));

        let color = synth.synthesize(&TypeName::from("Color")).unwrap();
        assert_eq!(color, Value::variant("Color", "RED"));

        let counter = synth.synthesize(&TypeName::from("Counter")).unwrap();
        assert_eq!(counter, Value::Int64(99));

        let clock = synth.synthesize(&TypeName::from("Clock")).unwrap();
        assert_eq!(clock, Value::Int64(1));
    }

    #[test]
    fn test_unsupported_type() {
        let registry = registry();
        let policy = policy();

        let err = synthesize(&registry, &TypeName::from("Socket"), &policy).unwrap_err();
        assert_eq!(err, SynthesisError::UnsupportedType(TypeName::from("Socket")));
    }

    #[test]
    fn test_empty_enumeration() {
        let registry = registry();
        let policy = policy();

        let err = synthesize(&registry, &TypeName::from("Empty"), &policy).unwrap_err();
        assert_eq!(err, SynthesisError::EmptyEnumeration(TypeName::from("Empty")));
    }

    #[test]
    fn test_leaf_generator_failure() {
        let registry = registry();
        let policy = policy();

        let err = synthesize(&registry, &TypeName::from("Broken"), &policy).unwrap_err();
        assert_eq!(
            err,
            SynthesisError::LeafGeneratorFailure {
                type_name: TypeName::from("Broken"),
                source: GeneratorError::Failed("no entropy".to_string()),
            }
        );
    }

    #[test]
    fn test_zero_arg_construction_failure() {
        let registry = registry();
        let policy = policy();

        let err = synthesize(&registry, &TypeName::from("Locked"), &policy).unwrap_err();
        assert!(matches!(
            err,
            SynthesisError::ConstructionFailure { type_name, .. } if type_name.as_str() == "Locked"
        ));
    }

    #[test]
    fn test_instances() {
        let registry = registry();
        let policy = policy();
        let synth = Synthesizer::new(&registry, &policy);

        let instances = synth.instances(&TypeName::from("Color"), 3);
        assert_eq!(instances.size_hint(), (3, Some(3)));

        let values: Vec<_> = instances.collect::<Result<_, _>>().unwrap();
        assert_eq!(values, vec![Value::variant("Color", "RED"); 3]);
    }

    #[test]
    fn test_instances_size_hint_for_huge_counts() {
        let registry = registry();
        let policy = policy();
        let synth = Synthesizer::new(&registry, &policy);

        let (lower, upper) = synth.instances(&TypeName::from("Color"), u64::MAX).size_hint();
        match usize::try_from(u64::MAX) {
            Ok(max) => assert_eq!((lower, upper), (max, Some(max))),
            Err(_) => assert_eq!((lower, upper), (usize::MAX, None)),
        }
    }
}
