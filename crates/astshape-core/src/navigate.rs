//! Name resolution across the node and named-type collections.
//!
//! Nodes are searched first, then named types. An unknown name is not an
//! error here: it resolves to an absent entry and the caller decides what
//! that means. Every other operation treats an absent entry as a
//! classification failure.

use log::trace;

use crate::model::{Entry, EntryMut, GrammarModel};

/// The result of resolving a name.
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    name: String,
    entry: Option<Entry<'a>>,
}

impl<'a> Resolution<'a> {
    /// Returns the name that was resolved.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the resolved entry, or `None` if the name is unknown.
    pub fn entry(&self) -> Option<Entry<'a>> {
        self.entry
    }

    /// Returns `true` when the name matched no entry.
    pub fn is_absent(&self) -> bool {
        self.entry.is_none()
    }
}

/// The result of resolving a name for editing.
#[derive(Debug)]
pub struct ResolutionMut<'a> {
    name: String,
    entry: Option<EntryMut<'a>>,
}

impl<'a> ResolutionMut<'a> {
    /// Returns the name that was resolved.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` when the name matched no entry.
    pub fn is_absent(&self) -> bool {
        self.entry.is_none()
    }

    /// Splits the resolution into the name and the entry.
    pub fn into_parts(self) -> (String, Option<EntryMut<'a>>) {
        (self.name, self.entry)
    }
}

/// Resolves `name`, preferring a node over a named type of the same name.
pub fn resolve<'a>(model: &'a GrammarModel, name: &str) -> Resolution<'a> {
    let entry = model
        .node(name)
        .map(Entry::Node)
        .or_else(|| model.named_type(name).map(Entry::NamedType));

    trace!(name, found = entry.is_some(); "Resolved name");

    Resolution {
        name: name.to_string(),
        entry,
    }
}

/// Resolves `name` for editing, with the same precedence as [`resolve`].
pub fn resolve_mut<'a>(model: &'a mut GrammarModel, name: &str) -> ResolutionMut<'a> {
    let entry = if model.node(name).is_some() {
        model.node_mut(name).map(EntryMut::Node)
    } else {
        model.named_type_mut(name).map(EntryMut::NamedType)
    };

    trace!(name, found = entry.is_some(); "Resolved name for editing");

    ResolutionMut {
        name: name.to_string(),
        entry,
    }
}
