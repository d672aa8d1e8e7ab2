//! # Record Projection
//!
//! Deep merge and MongoDB `$project`-style field selection for plain
//! hierarchical records.
//!
//! ## Modules
//!
//! - [`value`] - In-memory representation of YAML/JSON records
//! - [`merge`] - Right-biased deep merge of record layers
//! - [`project`] - Spec-driven field selection, renaming and re-nesting
//!
//! ```
//! use record_projection::{project, value, Spec};
//!
//! let input = value::from_json(r#"{"a": {"b": "b", "c": "c"}, "d": "d"}"#).unwrap();
//! let spec = Spec::from_json(r#"{"a": ["renamed", {"b": 1}]}"#).unwrap();
//! let output = project(&input, &[&spec]).unwrap();
//! assert_eq!(output.into_owned(), value::from_json(r#"{"renamed": {"b": "b"}}"#).unwrap());
//! ```

pub mod merge;
pub mod project;
pub mod value;

pub use merge::{merge, merge_values, MergeNode, MergeRecord};
pub use project::{project, project_all, ErrorKind, Projection, ProjectionError, Spec, SpecMap, SpecNode};
pub use value::{Map, Value};
