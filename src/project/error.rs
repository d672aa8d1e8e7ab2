//! Projection errors.

use thiserror::Error;

/// Broad category of a [`ProjectionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The projection was called without any spec.
    InvalidArgument,
    /// A spec does not follow the directive grammar.
    InvalidSpec,
}

/// ProjectionError is returned when a projection cannot be carried out.
///
/// Nothing is ever partially projected: the first error aborts the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("You must provide at least one projection spec.")]
    MissingSpec,

    #[error("Your projection spec should only contain ones, zeros, strings and arrays.")]
    InvalidDirective { path: String },

    #[error("Arrays in your projection should only contain one string and one projection spec.")]
    InvalidArrayDirective { path: String },

    #[error("failed to parse projection spec: {0}")]
    Syntax(String),
}

impl ProjectionError {
    /// Creates an invalid directive error.
    pub fn invalid_directive(path: impl Into<String>) -> Self {
        ProjectionError::InvalidDirective { path: path.into() }
    }

    /// Creates an invalid array directive error.
    pub fn invalid_array_directive(path: impl Into<String>) -> Self {
        ProjectionError::InvalidArrayDirective { path: path.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ProjectionError::MissingSpec => ErrorKind::InvalidArgument,
            ProjectionError::InvalidDirective { .. }
            | ProjectionError::InvalidArrayDirective { .. }
            | ProjectionError::Syntax(_) => ErrorKind::InvalidSpec,
        }
    }

    /// Dotted location of the offending directive, if any. The root spec
    /// is the empty string.
    pub fn path(&self) -> Option<&str> {
        match self {
            ProjectionError::InvalidDirective { path }
            | ProjectionError::InvalidArrayDirective { path } => Some(path),
            _ => None,
        }
    }
}
