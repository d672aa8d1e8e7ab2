//! Projection spec types and parsing.

use super::error::ProjectionError;
use crate::merge::{MergeNode, MergeRecord};
use crate::value::{self, Map, Value};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use indexmap::IndexMap;

/// Spec is a whole projection spec, or the sub-spec of a renamed field.
#[derive(Debug, Clone, PartialEq)]
pub enum Spec {
    /// The directive `1`: keep everything.
    KeepAll,
    /// Per-field directives.
    Fields(SpecMap),
}

/// SpecMap maps field names to directives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecMap {
    fields: IndexMap<String, SpecNode>,
}

/// SpecNode is the directive for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum SpecNode {
    /// `1`: keep the value as-is.
    Keep,
    /// `0`: drop the field. Same as leaving it out, but overrides a
    /// `Keep` from an earlier layer.
    Drop,
    /// `"name"`: keep the value as-is under another key.
    Rename(String),
    /// `{...}`: keep the field and project its value with the sub-spec.
    Nested(SpecMap),
    /// `["name", spec]`: rename the field and project its value.
    RenameNested(String, Spec),
}

impl Spec {
    /// Builds a spec from its directive form, validating every level.
    ///
    /// The root must be `1` or a map, and so must the sub-spec of a
    /// `["name", spec]` directive. A `0` in either place is rejected as an
    /// invalid directive rather than projecting to an empty record.
    pub fn from_value(value: &Value) -> Result<Spec, ProjectionError> {
        parse_spec(value, "")
    }

    /// Parses a spec from JSON text.
    pub fn from_json(json: &str) -> Result<Spec, ProjectionError> {
        let value = value::from_json(json).map_err(|e| ProjectionError::Syntax(e.to_string()))?;
        Spec::from_value(&value)
    }

    /// Parses a spec from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Spec, ProjectionError> {
        let value = value::from_yaml(yaml).map_err(|e| ProjectionError::Syntax(e.to_string()))?;
        Spec::from_value(&value)
    }

    /// Renders the spec back to its directive form.
    pub fn to_value(&self) -> Value {
        match self {
            Spec::KeepAll => Value::Int(1),
            Spec::Fields(fields) => Value::Map(fields.to_map()),
        }
    }

    pub fn as_fields(&self) -> Option<&SpecMap> {
        match self {
            Spec::Fields(fields) => Some(fields),
            Spec::KeepAll => None,
        }
    }
}

impl From<SpecMap> for Spec {
    fn from(fields: SpecMap) -> Self {
        Spec::Fields(fields)
    }
}

impl TryFrom<&Value> for Spec {
    type Error = ProjectionError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Spec::from_value(value)
    }
}

impl Serialize for Spec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Spec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Spec::from_value(&value).map_err(serde::de::Error::custom)
    }
}

impl SpecMap {
    pub fn new() -> Self {
        SpecMap {
            fields: IndexMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&SpecNode> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, node: SpecNode) {
        self.fields.insert(key.into(), node);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SpecNode)> {
        self.fields.iter()
    }

    pub fn keep(self, key: impl Into<String>) -> Self {
        self.with(key, SpecNode::Keep)
    }

    pub fn drop(self, key: impl Into<String>) -> Self {
        self.with(key, SpecNode::Drop)
    }

    pub fn rename(self, key: impl Into<String>, to: impl Into<String>) -> Self {
        self.with(key, SpecNode::Rename(to.into()))
    }

    pub fn nested(self, key: impl Into<String>, spec: SpecMap) -> Self {
        self.with(key, SpecNode::Nested(spec))
    }

    pub fn rename_nested(self, key: impl Into<String>, to: impl Into<String>, spec: impl Into<Spec>) -> Self {
        self.with(key, SpecNode::RenameNested(to.into(), spec.into()))
    }

    fn with(mut self, key: impl Into<String>, node: SpecNode) -> Self {
        self.set(key, node);
        self
    }

    fn to_map(&self) -> Map {
        self.fields
            .iter()
            .map(|(key, node)| (key.clone(), node.to_value()))
            .collect()
    }
}

impl SpecNode {
    /// Renders the directive back to its value form.
    pub fn to_value(&self) -> Value {
        match self {
            SpecNode::Keep => Value::Int(1),
            SpecNode::Drop => Value::Int(0),
            SpecNode::Rename(to) => Value::String(to.clone()),
            SpecNode::Nested(fields) => Value::Map(fields.to_map()),
            SpecNode::RenameNested(to, spec) => {
                Value::List(vec![Value::String(to.clone()), spec.to_value()])
            }
        }
    }
}

impl MergeRecord for SpecMap {
    type Node = SpecNode;

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &SpecNode)> + '_> {
        Box::new(self.fields.iter().map(|(k, v)| (k.as_str(), v)))
    }

    fn entry_mut(&mut self, key: &str) -> Option<&mut SpecNode> {
        self.fields.get_mut(key)
    }

    fn insert(&mut self, key: String, node: SpecNode) {
        self.fields.insert(key, node);
    }
}

impl MergeNode for SpecNode {
    type Record = SpecMap;

    // Only plain nested specs merge; renames always replace.
    fn as_record(&self) -> Option<&SpecMap> {
        match self {
            SpecNode::Nested(fields) => Some(fields),
            _ => None,
        }
    }

    fn from_record(record: SpecMap) -> Self {
        SpecNode::Nested(record)
    }
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn parse_spec(value: &Value, path: &str) -> Result<Spec, ProjectionError> {
    match value {
        Value::Map(map) => Ok(Spec::Fields(parse_fields(map, path)?)),
        _ if value.as_whole_number() == Some(1) => Ok(Spec::KeepAll),
        _ => Err(ProjectionError::invalid_directive(path)),
    }
}

fn parse_fields(map: &Map, path: &str) -> Result<SpecMap, ProjectionError> {
    let mut fields = SpecMap::new();
    for (key, value) in map.iter() {
        let node = parse_node(value, &child_path(path, key))?;
        fields.set(key.clone(), node);
    }
    Ok(fields)
}

fn parse_node(value: &Value, path: &str) -> Result<SpecNode, ProjectionError> {
    match value {
        Value::Map(map) => Ok(SpecNode::Nested(parse_fields(map, path)?)),
        Value::String(to) => Ok(SpecNode::Rename(to.clone())),
        Value::List(items) => match items.as_slice() {
            [Value::String(to), sub] => Ok(SpecNode::RenameNested(to.clone(), parse_spec(sub, path)?)),
            _ => Err(ProjectionError::invalid_array_directive(path)),
        },
        _ => match value.as_whole_number() {
            Some(1) => Ok(SpecNode::Keep),
            Some(0) => Ok(SpecNode::Drop),
            _ => Err(ProjectionError::invalid_directive(path)),
        },
    }
}
