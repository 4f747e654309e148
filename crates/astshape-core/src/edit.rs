//! Idempotent attribute upserts.
//!
//! Both entry shapes expose an attribute-bearing sequence through
//! [`AttributeSequence`]: a [`Node`] its attributes, a [`NamedType`] its
//! properties. The editor is written once against that trait.
//!
//! Lookup is by exact name before deciding between update and append, so
//! after any number of upserts no two attributes in a sequence share a name.
//!
//! # Example
//!
//! ```
//! use astshape_core::{
//!     edit::{UpsertOutcome, upsert},
//!     model::{GrammarModel, Node},
//!     navigate::resolve_mut,
//! };
//!
//! let mut model = GrammarModel::default();
//! model.insert_node("Function", Node::default());
//!
//! let (name, entry) = resolve_mut(&mut model, "Function").into_parts();
//! let outcome = upsert(&name, entry, "params", "List".into()).unwrap();
//! assert_eq!(outcome, UpsertOutcome::Appended { index: 0 });
//! ```

use log::debug;

use crate::{
    error::{ModelError, ShapeViolation},
    model::{Argument, Attribute, EntryMut, NamedType, Node, TypeExpression, TypeKind},
};

/// Capability of exposing an ordered, name-unique attribute sequence.
pub trait AttributeSequence {
    /// Returns the sequence in display order.
    fn attribute_sequence(&self) -> &[Attribute];

    /// Returns the sequence for in-place editing.
    fn attribute_sequence_mut(&mut self) -> &mut Vec<Attribute>;

    /// Returns the position of the attribute named `name`.
    fn position_of(&self, name: &str) -> Option<usize> {
        self.attribute_sequence()
            .iter()
            .position(|attr| attr.name() == name)
    }
}

impl AttributeSequence for Node {
    fn attribute_sequence(&self) -> &[Attribute] {
        self.attributes()
    }

    fn attribute_sequence_mut(&mut self) -> &mut Vec<Attribute> {
        self.attributes_mut()
    }
}

impl AttributeSequence for NamedType {
    fn attribute_sequence(&self) -> &[Attribute] {
        self.properties()
    }

    fn attribute_sequence_mut(&mut self) -> &mut Vec<Attribute> {
        self.properties_mut()
    }
}

/// What an upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// An existing attribute at `index` was changed in place.
    Updated { index: usize },
    /// A new attribute was appended at `index`, the end of the sequence.
    Appended { index: usize },
}

/// Sets the argument of the attribute `attribute` on `entry`.
///
/// On a hit, only the argument of the attribute's type is replaced; its
/// kind and position are kept. On a miss, a new attribute with kind
/// [`TypeKind::Unspecified`](crate::model::TypeKind::Unspecified) and the
/// given argument is appended. Use [`upsert_expression`] to control the kind.
///
/// # Errors
///
/// - [`ModelError::InvalidEntryShape`] when `entry` is absent.
/// - [`ModelError::InvalidTypeExpression`] when the kind and the new argument
///   together break a type invariant, e.g. alternatives under a `node` kind.
///
/// Nothing is modified on error.
pub fn upsert(
    name: &str,
    entry: Option<EntryMut<'_>>,
    attribute: &str,
    argument: Argument,
) -> Result<UpsertOutcome, ModelError> {
    let mut entry = require(name, entry)?;
    let sequence = sequence_of(&mut entry);

    let kind = sequence
        .position_of(attribute)
        .map_or(TypeKind::Unspecified, |index| {
            sequence.attribute_sequence()[index].ty().kind().clone()
        });
    let ty = checked(name, attribute, TypeExpression::new(kind, argument))?;

    let outcome = apply(sequence, attribute, ty);
    debug!(name, attribute, outcome:? = outcome; "Upserted attribute argument");
    Ok(outcome)
}

/// Sets the full type (kind and argument) of the attribute `attribute`.
///
/// On a hit the attribute's type is replaced and its position is kept; on a
/// miss the attribute is appended with exactly `ty`.
///
/// # Errors
///
/// - [`ModelError::InvalidEntryShape`] when `entry` is absent.
/// - [`ModelError::InvalidTypeExpression`] when `ty` breaks a type invariant.
///
/// Nothing is modified on error.
pub fn upsert_expression(
    name: &str,
    entry: Option<EntryMut<'_>>,
    attribute: &str,
    ty: TypeExpression,
) -> Result<UpsertOutcome, ModelError> {
    let mut entry = require(name, entry)?;
    let ty = checked(name, attribute, ty)?;

    let outcome = apply(sequence_of(&mut entry), attribute, ty);
    debug!(name, attribute, outcome:? = outcome; "Upserted attribute type");
    Ok(outcome)
}

fn require<'a>(name: &str, entry: Option<EntryMut<'a>>) -> Result<EntryMut<'a>, ModelError> {
    let entry = entry.ok_or_else(|| ModelError::invalid_shape(name, ShapeViolation::Absent))?;
    debug!(name, shape:% = entry.shape(); "Editing entry");
    Ok(entry)
}

fn checked(name: &str, attribute: &str, ty: TypeExpression) -> Result<TypeExpression, ModelError> {
    match ty.check_invariants() {
        Ok(()) => Ok(ty),
        Err(err) => {
            debug!(name, attribute, error:% = err; "Rejected attribute type");
            Err(ModelError::invalid_type(name, attribute, err))
        }
    }
}

fn sequence_of<'e>(entry: &'e mut EntryMut<'_>) -> &'e mut dyn AttributeSequence {
    match entry {
        EntryMut::Node(node) => &mut **node,
        EntryMut::NamedType(named_type) => &mut **named_type,
    }
}

fn apply(sequence: &mut dyn AttributeSequence, attribute: &str, ty: TypeExpression) -> UpsertOutcome {
    match sequence.position_of(attribute) {
        Some(index) => {
            *sequence.attribute_sequence_mut()[index].ty_mut() = ty;
            UpsertOutcome::Updated { index }
        }
        None => {
            let attributes = sequence.attribute_sequence_mut();
            attributes.push(Attribute::new(attribute, ty));
            UpsertOutcome::Appended {
                index: attributes.len() - 1,
            }
        }
    }
}
