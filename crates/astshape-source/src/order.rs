//! Attribute-ordering hints.
//!
//! The hint file lists, per node, the order its attributes should be shown
//! in. A non-indented identifier opens a node section and indented
//! identifiers below it name that node's attributes:
//!
//! ```text
//! # comments run to the end of the line
//! Function
//!   isAsync
//!   isGenerator
//!   name
//!   params
//!   body
//! ```
//!
//! Applying the hints only reorders attributes; it never adds or drops one.

use std::ops::Range;

use indexmap::IndexMap;
use log::{debug, info, warn};
use winnow::{
    Parser as _,
    ascii::{line_ending, space0, till_line_ending},
    combinator::{eof, opt, separated, terminated},
    error::ModalResult,
    stream::LocatingSlice,
    token::take_while,
};

use astshape_core::model::GrammarModel;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, SourceError},
    span::Span,
};

type Input<'s> = LocatingSlice<&'s str>;

/// A hinted name together with where it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Hinted {
    name: String,
    span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    span: Span,
    attributes: Vec<Hinted>,
}

/// Parsed attribute-ordering hints, keyed by node name in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeOrder {
    sections: IndexMap<String, Section>,
}

impl AttributeOrder {
    /// Returns the number of node sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns `true` when no node section was given.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Returns the hinted attribute order for `node`.
    pub fn attributes_for(&self, node: &str) -> Option<Vec<&str>> {
        self.sections.get(node).map(|section| {
            section
                .attributes
                .iter()
                .map(|hinted| hinted.name.as_str())
                .collect()
        })
    }

    /// Reorders the attributes of every hinted node in `model`.
    ///
    /// Returns warnings for hints that name an unknown node ([`ErrorCode::W300`])
    /// or an attribute the node does not have ([`ErrorCode::W301`]). Their
    /// spans point into the hint text.
    pub fn apply(&self, model: &mut GrammarModel) -> Vec<Diagnostic> {
        let mut warnings = Vec::new();

        for (node_name, section) in &self.sections {
            let Some(node) = model.node_mut(node_name) else {
                warn!(node = node_name.as_str(); "Attribute order names an unknown node");
                warnings.push(
                    Diagnostic::warning(format!("no node named `{node_name}` to order"))
                        .with_code(ErrorCode::W300)
                        .with_label(section.span, "unknown node"),
                );
                continue;
            };

            let order: Vec<&str> = section
                .attributes
                .iter()
                .map(|hinted| hinted.name.as_str())
                .collect();
            for unknown in node.reorder_attributes(&order[..]) {
                warn!(node = node_name.as_str(), attribute = unknown.as_str(); "Attribute order names an unknown attribute");
                let span = section
                    .attributes
                    .iter()
                    .find(|hinted| hinted.name == unknown)
                    .map(|hinted| hinted.span);
                warnings.push(
                    Diagnostic::warning(format!(
                        "node `{node_name}` has no attribute `{unknown}`"
                    ))
                    .with_code(ErrorCode::W301)
                    .with_optional_label(span, "unknown attribute"),
                );
            }
            debug!(node = node_name.as_str(); "Applied attribute order");
        }

        info!(sections = self.sections.len(), warnings = warnings.len(); "Attribute order applied");
        warnings
    }
}

/// Parses an attribute-ordering hint file.
///
/// # Errors
///
/// Returns a [`SourceError`] for a malformed line ([`ErrorCode::E201`]), an
/// attribute before any node section ([`ErrorCode::E200`]), an attribute
/// listed twice in a section ([`ErrorCode::E202`]) or a node section listed
/// twice ([`ErrorCode::E203`]).
pub fn parse_attribute_order(source: &str) -> Result<AttributeOrder, SourceError> {
    let lines = document
        .parse(LocatingSlice::new(source))
        .map_err(|err| syntax_error(source, err.offset()))?;

    let mut collector = DiagnosticCollector::new();
    let mut order = AttributeOrder::default();
    let mut current: Option<String> = None;

    for line in lines {
        match line {
            Line::Blank => {}
            Line::Section(name, range) => {
                let span = Span::new(range);
                if let Some(first) = order.sections.get(name) {
                    collector.emit(
                        Diagnostic::error(format!("node `{name}` is ordered more than once"))
                            .with_code(ErrorCode::E203)
                            .with_label(span, "listed again here")
                            .with_secondary_label(first.span, "first listed here")
                            .with_help("merge both sections into one"),
                    );
                    current = None;
                    continue;
                }
                order.sections.insert(
                    name.to_string(),
                    Section {
                        span,
                        attributes: Vec::new(),
                    },
                );
                current = Some(name.to_string());
            }
            Line::Attribute(name, range) => {
                let span = Span::new(range);
                let Some(section) = current.as_ref().and_then(|node| order.sections.get_mut(node))
                else {
                    if order.sections.is_empty() {
                        collector.emit(
                            Diagnostic::error(format!(
                                "attribute `{name}` is listed outside of any node section"
                            ))
                            .with_code(ErrorCode::E200)
                            .with_label(span, "no node to attach to")
                            .with_help("start a section with an unindented node name"),
                        );
                    }
                    continue;
                };

                if let Some(first) = section.attributes.iter().find(|hinted| hinted.name == name) {
                    collector.emit(
                        Diagnostic::error(format!("attribute `{name}` is listed more than once"))
                            .with_code(ErrorCode::E202)
                            .with_label(span, "listed again here")
                            .with_secondary_label(first.span, "first listed here"),
                    );
                    continue;
                }
                section.attributes.push(Hinted {
                    name: name.to_string(),
                    span,
                });
            }
        }
    }

    collector.finish()?;
    debug!(sections = order.len(); "Attribute order parsed");
    Ok(order)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line<'s> {
    Blank,
    Section(&'s str, Range<usize>),
    Attribute(&'s str, Range<usize>),
}

fn document<'s>(input: &mut Input<'s>) -> ModalResult<Vec<Line<'s>>> {
    terminated(separated(0.., line, line_ending), eof).parse_next(input)
}

fn line<'s>(input: &mut Input<'s>) -> ModalResult<Line<'s>> {
    let indent = space0.parse_next(input)?;
    let name = opt(identifier.with_span()).parse_next(input)?;
    space0.parse_next(input)?;
    opt(comment).parse_next(input)?;

    Ok(match name {
        None => Line::Blank,
        Some((name, range)) if indent.is_empty() => Line::Section(name, range),
        Some((name, range)) => Line::Attribute(name, range),
    })
}

fn identifier<'s>(input: &mut Input<'s>) -> ModalResult<&'s str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_' || c == '$').parse_next(input)
}

fn comment(input: &mut Input<'_>) -> ModalResult<()> {
    ('#', till_line_ending).void().parse_next(input)
}

fn syntax_error(source: &str, offset: usize) -> SourceError {
    let offset = offset.min(source.len());
    let end = source[offset..]
        .find(['\r', '\n'])
        .map_or(source.len(), |len| offset + len);

    Diagnostic::error("malformed attribute order line")
        .with_code(ErrorCode::E201)
        .with_label(Span::new(offset..end), "unexpected text")
        .with_help("each line holds one identifier, optionally followed by a `#` comment")
        .into()
}
