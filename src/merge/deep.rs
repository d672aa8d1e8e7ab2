//! Right-biased deep merge of record layers.

use crate::value::{Map, Value};
use std::borrow::Cow;

/// A record whose entries are [`MergeNode`]s.
///
/// Implemented by data records ([`Map`]) and projection specs
/// ([`SpecMap`](crate::project::SpecMap)) so both layer the same way.
pub trait MergeRecord: Clone + Default {
    type Node: MergeNode<Record = Self>;

    /// Entries in enumeration order.
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &Self::Node)> + '_>;

    fn entry_mut(&mut self, key: &str) -> Option<&mut Self::Node>;

    fn insert(&mut self, key: String, node: Self::Node);
}

/// A single value inside a [`MergeRecord`].
pub trait MergeNode: Clone {
    type Record: MergeRecord<Node = Self>;

    /// Returns the nested record when this node is record-shaped.
    /// Anything else overwrites on conflict instead of merging.
    fn as_record(&self) -> Option<&Self::Record>;

    fn from_record(record: Self::Record) -> Self;
}

/// Deep-merges `sources` left to right; later sources win.
///
/// Ownership of the result depends on the number of sources:
///
/// - none: a new empty record ([`Cow::Owned`]).
/// - one: the source itself, [`Cow::Borrowed`]. No copy is made, so
///   callers must not assume a defensive copy on this path.
/// - two or more: a freshly built record ([`Cow::Owned`]).
///
/// On a key conflict the later value replaces the earlier one unless both
/// are record-shaped, in which case the two are merged recursively.
/// Sources are never mutated.
pub fn merge<'a, R: MergeRecord>(sources: &[&'a R]) -> Cow<'a, R> {
    match sources {
        [] => Cow::Owned(R::default()),
        [only] => Cow::Borrowed(*only),
        _ => Cow::Owned(merge_owned(sources)),
    }
}

fn merge_owned<R: MergeRecord>(sources: &[&R]) -> R {
    let mut output = R::default();
    for source in sources {
        for (key, node) in source.entries() {
            match output.entry_mut(key) {
                None => output.insert(key.to_string(), node.clone()),
                Some(existing) => {
                    let merged = match (existing.as_record(), node.as_record()) {
                        (Some(ours), Some(theirs)) => {
                            <R::Node as MergeNode>::from_record(merge_owned(&[ours, theirs]))
                        }
                        _ => node.clone(),
                    };
                    *existing = merged;
                }
            }
        }
    }
    output
}

/// Deep-merges data values.
///
/// Layers that are not maps have no keys and contribute nothing. A single
/// layer is returned as-is, whatever its shape.
pub fn merge_values<'a>(sources: &[&'a Value]) -> Cow<'a, Value> {
    if let [only] = sources {
        return Cow::Borrowed(*only);
    }
    let maps: Vec<&Map> = sources.iter().filter_map(|v| v.as_map()).collect();
    Cow::Owned(Value::Map(merge(maps.as_slice()).into_owned()))
}

impl MergeRecord for Map {
    type Node = Value;

    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &Value)> + '_> {
        Box::new(self.fields.iter().map(|(k, v)| (k.as_str(), v)))
    }

    fn entry_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.get_mut(key)
    }

    fn insert(&mut self, key: String, node: Value) {
        self.set(key, node);
    }
}

impl MergeNode for Value {
    type Record = Map;

    fn as_record(&self) -> Option<&Map> {
        self.as_map()
    }

    fn from_record(record: Map) -> Self {
        Value::Map(record)
    }
}
