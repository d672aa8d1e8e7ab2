//! MongoDB `$project`-style projection of records.

use super::error::ProjectionError;
use super::spec::{Spec, SpecMap, SpecNode};
use crate::merge::merge;
use crate::value::{Map, Value};
use std::borrow::Cow;
use tracing::{debug, trace};

/// Projects `input` through the given spec layers.
///
/// Layers are deep-merged left to right first, so later specs override
/// earlier ones: `project(v, [{a: 1, b: 1}, {a: 0}])` behaves like
/// `project(v, [{a: 0, b: 1}])`. Lists are projected element by element.
///
/// The result is [`Cow::Borrowed`] only when exactly one spec is given and
/// it is [`Spec::KeepAll`]; `input` itself is then returned, not a copy.
/// Every other result is freshly built.
///
/// Fails with [`ProjectionError::MissingSpec`] when `specs` is empty and
/// there is anything other than (possibly nested, possibly empty) lists
/// to project.
pub fn project<'a>(input: &'a Value, specs: &[&Spec]) -> Result<Cow<'a, Value>, ProjectionError> {
    if specs.is_empty() {
        return match input {
            Value::List(items) => {
                let projected = items
                    .iter()
                    .map(|item| project(item, specs).map(Cow::into_owned))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Cow::Owned(Value::List(projected)))
            }
            _ => Err(ProjectionError::MissingSpec),
        };
    }
    Ok(Projection::new(specs)?.apply(input))
}

/// Projects every input through the same spec layers, merging them once.
pub fn project_all(inputs: &[Value], specs: &[&Spec]) -> Result<Vec<Value>, ProjectionError> {
    let projection = Projection::new(specs)?;
    Ok(inputs
        .iter()
        .map(|input| projection.apply(input).into_owned())
        .collect())
}

/// Projection is a set of spec layers merged into one effective spec,
/// ready to be applied to any number of inputs.
#[derive(Debug, Clone)]
pub struct Projection<'s> {
    effective: Effective<'s>,
}

#[derive(Debug, Clone)]
enum Effective<'s> {
    KeepAll,
    Fields(Cow<'s, SpecMap>),
}

impl<'s> Projection<'s> {
    /// Merges `specs` into one effective spec.
    ///
    /// A single field spec is borrowed rather than copied. When more than
    /// one layer is given, keep-all layers are not record-shaped and add
    /// no fields to the merge.
    pub fn new(specs: &[&'s Spec]) -> Result<Self, ProjectionError> {
        let effective = match specs {
            [] => return Err(ProjectionError::MissingSpec),
            [Spec::KeepAll] => Effective::KeepAll,
            _ => {
                let layers: Vec<&'s SpecMap> = specs.iter().filter_map(|s| s.as_fields()).collect();
                Effective::Fields(merge(layers.as_slice()))
            }
        };
        debug!(layers = specs.len(), "compiled projection");
        Ok(Projection { effective })
    }

    /// The merged spec this projection applies.
    pub fn spec(&self) -> Spec {
        match &self.effective {
            Effective::KeepAll => Spec::KeepAll,
            Effective::Fields(fields) => Spec::Fields(fields.as_ref().clone()),
        }
    }

    /// Applies the projection to `input`.
    ///
    /// Cannot fail: the spec grammar is checked when a [`Spec`] is built.
    pub fn apply<'a>(&self, input: &'a Value) -> Cow<'a, Value> {
        match (input, &self.effective) {
            (Value::List(items), _) => Cow::Owned(Value::List(
                items.iter().map(|item| self.apply(item).into_owned()).collect(),
            )),
            (_, Effective::KeepAll) => {
                trace!("keep-all projection, returning input");
                Cow::Borrowed(input)
            }
            (_, Effective::Fields(fields)) => Cow::Owned(Value::Map(project_fields(input, fields))),
        }
    }
}

fn project_value(input: &Value, spec: &Spec) -> Value {
    match spec {
        Spec::KeepAll => input.clone(),
        Spec::Fields(fields) => project_with_fields(input, fields),
    }
}

fn project_with_fields(input: &Value, fields: &SpecMap) -> Value {
    match input {
        Value::List(items) => Value::List(
            items
                .iter()
                .map(|item| project_with_fields(item, fields))
                .collect(),
        ),
        _ => Value::Map(project_fields(input, fields)),
    }
}

// Only keys present on the input are visited. Non-map inputs have no keys
// and project to an empty map.
fn project_fields(input: &Value, spec: &SpecMap) -> Map {
    let mut output = Map::new();
    let Some(record) = input.as_map() else {
        return output;
    };
    for (key, value) in record.iter() {
        match spec.get(key) {
            None | Some(SpecNode::Drop) => {}
            Some(SpecNode::Keep) => output.set(key.clone(), value.clone()),
            Some(SpecNode::Nested(fields)) => {
                output.set(key.clone(), project_with_fields(value, fields))
            }
            Some(SpecNode::Rename(to)) => output.set(to.clone(), value.clone()),
            Some(SpecNode::RenameNested(to, sub)) => output.set(to.clone(), project_value(value, sub)),
        }
    }
    output
}
