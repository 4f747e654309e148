//! Error types for model operations.
//!
//! Every error here is fatal for the operation in progress. Operations check
//! for these conditions before touching the model, so a returned error never
//! leaves a half-applied edit behind.

use std::fmt;

use thiserror::Error;

/// The main error type for classification, editing and rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// An entry matched neither the node shape nor the named-type shape.
    #[error("invalid entry shape for `{name}`: {reason}")]
    InvalidEntryShape { name: String, reason: ShapeViolation },

    /// A type expression could not be rendered under the documented rules.
    #[error("malformed type expression in `{name}`: {detail}")]
    MalformedTypeExpression { name: String, detail: String },

    /// An edit would store a type expression that breaks a structural invariant.
    #[error("rejected type for attribute `{attribute}` of `{name}`: {source}")]
    InvalidTypeExpression {
        name: String,
        attribute: String,
        source: TypeInvariantError,
    },
}

impl ModelError {
    /// Create an [`ModelError::InvalidEntryShape`] for the named entry.
    pub fn invalid_shape(name: impl Into<String>, reason: ShapeViolation) -> Self {
        Self::InvalidEntryShape {
            name: name.into(),
            reason,
        }
    }

    /// Create a [`ModelError::MalformedTypeExpression`] for the named entry.
    pub fn malformed(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MalformedTypeExpression {
            name: name.into(),
            detail: detail.into(),
        }
    }

    /// Create a [`ModelError::InvalidTypeExpression`] for an attribute of the named entry.
    pub fn invalid_type(
        name: impl Into<String>,
        attribute: impl Into<String>,
        source: TypeInvariantError,
    ) -> Self {
        Self::InvalidTypeExpression {
            name: name.into(),
            attribute: attribute.into(),
            source,
        }
    }

    /// Returns the name of the entry the error was raised for.
    pub fn entry_name(&self) -> &str {
        match self {
            Self::InvalidEntryShape { name, .. }
            | Self::MalformedTypeExpression { name, .. }
            | Self::InvalidTypeExpression { name, .. } => name,
        }
    }
}

/// Why an entry failed shape classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeViolation {
    /// The name did not resolve to any entry.
    Absent,
    /// The entry exposes the fields of both shapes at once.
    Ambiguous,
    /// The entry exposes the complete field set of neither shape.
    Unrecognized,
}

impl fmt::Display for ShapeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeViolation::Absent => write!(f, "no entry with this name exists"),
            ShapeViolation::Ambiguous => write!(
                f,
                "entry carries both node fields and type-expression fields"
            ),
            ShapeViolation::Unrecognized => write!(
                f,
                "entry needs either `parents`, `children` and `attributes`, or `kind` and `argument`"
            ),
        }
    }
}

/// A structural invariant of a [`TypeExpression`](crate::model::TypeExpression)
/// that does not hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeInvariantError {
    /// A union with fewer than two alternatives.
    #[error("a union needs at least two alternatives, found {found}")]
    UnionArity { found: usize },

    /// A non-union kind carrying a sequence of alternatives.
    #[error("kind `{kind}` cannot carry a sequence of alternatives")]
    UnexpectedAlternatives { kind: String },
}
