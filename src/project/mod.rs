//! Project module - Field selection and renaming driven by projection specs.
//!
//! A [`Spec`] is a tree of directives: keep (`1`), drop (`0`), rename
//! (`"name"`), nested (`{...}`) and rename-nested (`["name", {...}]`).
//! Several specs can be layered; they are combined with
//! [`merge`](crate::merge::merge) before projecting.

mod error;
mod projection;
mod spec;


pub use error::*;
pub use projection::*;
pub use spec::*;
