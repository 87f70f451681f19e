//! Error types for relation declaration and record-kind resolution.
//!
//! All errors here surface synchronously at declaration time; none are
//! swallowed or logged-and-continued, because a half-built relation graph
//! is unsafe to hand to the persistence engine for query planning.

use std::fmt;

/// Error type for relation-mapping operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationError {
    /// Empty or malformed record-kind/column name supplied to the naming
    /// convention engine
    InvalidName { name: String },
    /// Target record-kind could not be located by the module-loading
    /// collaborator
    UnresolvedKind { target: String, reason: String },
    /// Malformed explicit join override (expected `"Table.column"`)
    InvalidJoinSpec { spec: String, reason: String },
}

impl fmt::Display for RelationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationError::InvalidName { name } => {
                write!(f, "Invalid record-kind or column name: {:?}", name)
            }
            RelationError::UnresolvedKind { target, reason } => {
                write!(f, "Unresolved record-kind {:?}: {}", target, reason)
            }
            RelationError::InvalidJoinSpec { spec, reason } => {
                write!(f, "Invalid join spec {:?}: {}", spec, reason)
            }
        }
    }
}

impl std::error::Error for RelationError {}
