//! Classification of grammar entries into one of two disjoint shapes.
//!
//! Typed entries ([`Entry`]) carry their shape in the variant, so classifying
//! them is a total match. Classification can still fail in two places:
//!
//! - a name that resolved to nothing (see [`classify`]);
//! - a raw entry produced by a grammar source, before it has been converted
//!   into a typed entry (see [`ShapeProbe`]).

use std::fmt;

use log::debug;

use crate::{
    error::{ModelError, ShapeViolation},
    model::Entry,
};

/// The two mutually exclusive shapes of a grammar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Node,
    NamedType,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Node => write!(f, "node"),
            Shape::NamedType => write!(f, "named type"),
        }
    }
}

/// Classifies a possibly absent entry.
///
/// # Errors
///
/// Returns [`ModelError::InvalidEntryShape`] with [`ShapeViolation::Absent`]
/// when `entry` is `None`.
pub fn classify(name: &str, entry: Option<Entry<'_>>) -> Result<Shape, ModelError> {
    match entry {
        Some(entry) => Ok(entry.shape()),
        None => Err(ModelError::invalid_shape(name, ShapeViolation::Absent)),
    }
}

/// The presence of each shape-relevant field on a raw, untyped entry.
///
/// Grammar sources fill this in from whatever representation they read and
/// classify the entry before building a typed [`Node`](crate::model::Node) or
/// [`NamedType`](crate::model::NamedType) from it.
///
/// # Example
///
/// ```
/// use astshape_core::shape::{Shape, ShapeProbe};
///
/// let probe = ShapeProbe {
///     parents: true,
///     children: true,
///     attributes: true,
///     ..ShapeProbe::default()
/// };
/// assert_eq!(probe.classify("Function").unwrap(), Shape::Node);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShapeProbe {
    pub parents: bool,
    pub children: bool,
    pub attributes: bool,
    pub kind: bool,
    pub argument: bool,
}

impl ShapeProbe {
    /// Returns `true` when all node fields are present. An empty attribute
    /// sequence still counts as present.
    pub fn has_node_fields(&self) -> bool {
        self.parents && self.children && self.attributes
    }

    /// Returns `true` when both type-expression fields are present.
    pub fn has_type_fields(&self) -> bool {
        self.kind && self.argument
    }

    /// Classifies the probed entry.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidEntryShape`] when the entry matches
    /// neither shape ([`ShapeViolation::Unrecognized`]) or both
    /// ([`ShapeViolation::Ambiguous`]).
    pub fn classify(&self, name: &str) -> Result<Shape, ModelError> {
        let shape = match (self.has_node_fields(), self.has_type_fields()) {
            (true, false) => Shape::Node,
            (false, true) => Shape::NamedType,
            (true, true) => {
                return Err(ModelError::invalid_shape(name, ShapeViolation::Ambiguous));
            }
            (false, false) => {
                return Err(ModelError::invalid_shape(
                    name,
                    ShapeViolation::Unrecognized,
                ));
            }
        };

        debug!(name, shape:% = shape; "Classified entry");
        Ok(shape)
    }
}
