//! Schema introspection error types.

use thiserror::Error;

/// Errors raised while describing or resolving target types.
///
/// Every schema error is a defect in the registered schema, not in the
/// incoming request: the binder classifies them as server errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// No descriptor is registered under the referenced type name.
    #[error("no descriptor registered for type '{type_name}'")]
    UnknownType {
        /// The unresolvable type name.
        type_name: String,
    },

    /// A descriptor references a field the binder cannot interpret.
    #[error("invalid descriptor for type '{type_name}': {reason}")]
    InvalidDescriptor {
        /// The type whose descriptor is malformed.
        type_name: String,
        /// Explanation of the defect.
        reason: String,
    },
}

impl SchemaError {
    /// Creates an unknown-type error.
    #[must_use]
    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        Self::UnknownType {
            type_name: type_name.into(),
        }
    }

    /// Creates an invalid-descriptor error.
    #[must_use]
    pub fn invalid_descriptor(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }
}
