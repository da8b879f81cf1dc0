//! Composite resolution.
//!
//! A composite instance is built by synthesizing an argument for every
//! required constructor parameter and letting the constructor default the
//! rest. Defaulted parameters are never passed, nullable required
//! parameters always receive the absent value, and the first failure aborts
//! the whole instance.

use crate::dispatcher::{CycleGuard, Synthesizer};
use crate::error::SynthesisError;
use synth_core::{Arguments, CompositeShape, ParameterDescriptor, TypeMetadata, TypeName, Value};
use tracing::{debug, trace};

impl<M: TypeMetadata + ?Sized> Synthesizer<'_, M> {
    pub(crate) fn resolve_composite(
        &self,
        ty: &TypeName,
        shape: &CompositeShape,
        path: &mut Vec<TypeName>,
    ) -> Result<Value, SynthesisError> {
        debug!(type_name = %ty, depth = path.len(), "resolving composite");

        path.push(ty.clone());
        let args = self.resolve_arguments(ty, shape, path);
        path.pop();

        shape
            .constructor()
            .construct(args?)
            .map_err(|source| SynthesisError::ConstructionFailure {
                type_name: ty.clone(),
                source,
            })
    }

    fn resolve_arguments(
        &self,
        ty: &TypeName,
        shape: &CompositeShape,
        path: &mut Vec<TypeName>,
    ) -> Result<Arguments, SynthesisError> {
        let mut args = Arguments::with_capacity(shape.parameters().len());

        for parameter in shape.required_parameters() {
            let value = if parameter.nullable {
                trace!(type_name = %ty, parameter = %parameter.name, "nullable parameter left absent");
                Value::Null
            } else {
                if self.is_composite(&parameter.type_name) {
                    self.check_cycle(ty, parameter, path)?;
                }
                self.dispatch(&parameter.type_name, path)?
            };
            args.insert(parameter.name.clone(), value);
        }

        Ok(args)
    }

    /// Fail before recursing if `parameter` would re-enter a composite type
    /// the guard considers in progress. `path` ends with `owner`.
    fn check_cycle(
        &self,
        owner: &TypeName,
        parameter: &ParameterDescriptor,
        path: &[TypeName],
    ) -> Result<(), SynthesisError> {
        let target = &parameter.type_name;
        let cycle_start = match self.cycle_guard {
            CycleGuard::SelfReference => (target == owner).then(|| path.len().saturating_sub(1)),
            CycleGuard::InProgress => path.iter().position(|t| t == target),
        };

        match cycle_start {
            Some(start) => {
                let mut cycle = path[start..].to_vec();
                cycle.push(target.clone());
                Err(SynthesisError::UnboundedRecursion {
                    type_name: owner.clone(),
                    parameter: parameter.name.clone(),
                    cycle,
                })
            }
            None => Ok(()),
        }
    }
}
