//! Value module - In-memory representation of YAML/JSON records.
//!
//! Both engines read values and never mutate them.

mod value;

pub use value::*;
