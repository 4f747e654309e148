//! Grammar sources for AstShape.
//!
//! This crate turns external text into a [`GrammarModel`]: the JSON form of
//! a grammar, and an optional attribute-ordering hint file applied on top of
//! it. Problems are reported as [`error::Diagnostic`]s with spans into the
//! text they came from.
//!
//! # Example
//!
//! ```
//! use astshape_source::{GrammarSource, JsonGrammarSource};
//!
//! let grammar = r#"{
//!     "nodes": {
//!         "Function": {
//!             "parents": ["Node"],
//!             "children": [],
//!             "attributes": [
//!                 { "name": "name", "type": { "kind": "node", "argument": "BindingIdentifier" } },
//!                 { "name": "isAsync", "type": { "kind": "value", "argument": "boolean" } }
//!             ]
//!         }
//!     },
//!     "namedTypes": {}
//! }"#;
//!
//! let source = JsonGrammarSource::new(grammar).with_attribute_order("Function\n  isAsync\n");
//! let loaded = source.load().expect("valid grammar");
//!
//! let node = loaded.model().node("Function").unwrap();
//! assert_eq!(node.attributes()[0].name(), "isAsync");
//! assert!(loaded.warnings().is_empty());
//! ```

pub mod error;

mod grammar;
mod order;
mod span;

pub use grammar::load_grammar;
pub use order::{AttributeOrder, parse_attribute_order};
pub use span::Span;

use log::debug;

use astshape_core::model::GrammarModel;

use error::{Diagnostic, SourceError};

/// Where a failing or warning diagnostic points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The grammar document.
    Grammar,
    /// The attribute-ordering hints.
    AttributeOrder,
}

/// A [`SourceError`] tagged with the text its spans refer to.
#[derive(Debug)]
pub struct LoadError {
    origin: Origin,
    error: SourceError,
}

impl LoadError {
    /// Returns which input the diagnostics point into.
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Returns the underlying diagnostics.
    pub fn error(&self) -> &SourceError {
        &self.error
    }

    /// Unwraps into the underlying error.
    pub fn into_error(self) -> SourceError {
        self.error
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for LoadError {}

/// A successfully loaded model and the warnings raised while loading it.
///
/// Warnings always come from the attribute-ordering hints.
#[derive(Debug, Clone)]
pub struct Loaded {
    model: GrammarModel,
    warnings: Vec<Diagnostic>,
}

impl Loaded {
    /// Returns the loaded model.
    pub fn model(&self) -> &GrammarModel {
        &self.model
    }

    /// Returns the warnings, in the order they were raised.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Splits into the model and the warnings.
    pub fn into_parts(self) -> (GrammarModel, Vec<Diagnostic>) {
        (self.model, self.warnings)
    }
}

/// Something a [`GrammarModel`] can be loaded from.
pub trait GrammarSource {
    /// Loads the model.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] naming the input whose diagnostics failed.
    fn load(&self) -> Result<Loaded, LoadError>;
}

/// A grammar in its JSON form, with optional attribute-ordering hints.
#[derive(Debug, Clone, Copy)]
pub struct JsonGrammarSource<'a> {
    grammar: &'a str,
    attribute_order: Option<&'a str>,
}

impl<'a> JsonGrammarSource<'a> {
    /// Creates a source over the JSON text `grammar`.
    pub fn new(grammar: &'a str) -> Self {
        Self {
            grammar,
            attribute_order: None,
        }
    }

    /// Adds attribute-ordering hints applied after loading.
    pub fn with_attribute_order(mut self, hints: &'a str) -> Self {
        self.attribute_order = Some(hints);
        self
    }
}

impl GrammarSource for JsonGrammarSource<'_> {
    fn load(&self) -> Result<Loaded, LoadError> {
        let mut model = load_grammar(self.grammar).map_err(|error| LoadError {
            origin: Origin::Grammar,
            error,
        })?;

        let warnings = match self.attribute_order {
            Some(hints) => {
                let order = parse_attribute_order(hints).map_err(|error| LoadError {
                    origin: Origin::AttributeOrder,
                    error,
                })?;
                order.apply(&mut model)
            }
            None => Vec::new(),
        };

        debug!(warnings = warnings.len(); "Grammar source loaded");
        Ok(Loaded { model, warnings })
    }
}
