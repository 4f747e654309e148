//! Canonical textual rendering of a single grammar entry.
//!
//! The output is meant for human inspection and audit, not for reparsing.
//!
//! A node renders as its name followed by one line per attribute:
//!
//! ```text
//! Function
//! isAsync : boolean
//! rest : nullable [ Identifier ]
//! ```
//!
//! A scalar argument prints as `name : label`. A nested argument prints as
//! `name : kind [ inner ]` where `kind` is the attribute's own kind and
//! `inner` is the raw argument of the nested expression. Only one level is
//! unfolded; anything deeper is printed verbatim in its serialized form. A
//! node without attributes lists its children instead.
//!
//! A named type renders as its name, its kind, and the labels of its
//! alternatives joined by `" | "` for unions and by a single space otherwise:
//!
//! ```text
//! BindingPattern
//! kind: union
//! ObjectBinding | ArrayBinding | BindingIdentifier
//! ```
//!
//! Every rendering ends with a blank line. Rendering builds the whole text
//! before returning it, so a failure never yields partial output.

use log::trace;

use crate::{
    error::{ModelError, ShapeViolation},
    model::{Argument, Attribute, Entry, NamedType, Node, TypeExpression},
};

/// Switches for the optional parts of a rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// List children when a node has no attributes.
    pub children_fallback: bool,
    /// End every rendering with a blank line.
    pub trailing_blank_line: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            children_fallback: true,
            trailing_blank_line: true,
        }
    }
}

/// Renders entries with a fixed set of [`RenderOptions`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    /// Creates a renderer with the given options.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Returns the options used by this renderer.
    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Renders the entry `entry` registered under `name`.
    ///
    /// # Errors
    ///
    /// - [`ModelError::InvalidEntryShape`] when `entry` is absent.
    /// - [`ModelError::MalformedTypeExpression`] when an argument cannot be
    ///   rendered: an attribute whose argument is a sequence of alternatives,
    ///   or a named-type alternative whose own argument is not a label.
    pub fn render(&self, name: &str, entry: Option<Entry<'_>>) -> Result<String, ModelError> {
        let Some(entry) = entry else {
            return Err(ModelError::invalid_shape(name, ShapeViolation::Absent));
        };

        let mut lines = vec![name.to_string()];
        match entry {
            Entry::Node(node) => self.node_lines(name, node, &mut lines)?,
            Entry::NamedType(named_type) => named_type_lines(name, named_type, &mut lines)?,
        }

        let mut output = lines.join("\n");
        output.push('\n');
        if self.options.trailing_blank_line {
            output.push('\n');
        }

        trace!(name, output = output.as_str(); "Rendered entry");
        Ok(output)
    }

    fn node_lines(&self, name: &str, node: &Node, lines: &mut Vec<String>) -> Result<(), ModelError> {
        if node.attributes().is_empty() && self.options.children_fallback {
            lines.push("no attributes, children:".to_string());
            lines.extend(node.children().iter().cloned());
        }

        for attribute in node.attributes() {
            lines.push(attribute_line(name, attribute)?);
        }
        Ok(())
    }
}

/// Renders `entry` with default [`RenderOptions`].
///
/// # Errors
///
/// See [`Renderer::render`].
pub fn render(name: &str, entry: Option<Entry<'_>>) -> Result<String, ModelError> {
    Renderer::default().render(name, entry)
}

fn attribute_line(name: &str, attribute: &Attribute) -> Result<String, ModelError> {
    let ty = attribute.ty();
    match ty.argument() {
        Argument::Scalar(label) => Ok(format!("{} : {}", attribute.name(), label)),
        Argument::Nested(inner) => Ok(format!(
            "{} : {} [ {} ]",
            attribute.name(),
            ty.kind(),
            raw_argument(name, inner)?
        )),
        Argument::Alternatives(alternatives) => Err(ModelError::malformed(
            name,
            format!(
                "attribute `{}` carries {} alternatives where a label or a nested expression is expected",
                attribute.name(),
                alternatives.len()
            ),
        )),
    }
}

/// The argument of `inner` as written, without unfolding further levels.
fn raw_argument(name: &str, inner: &TypeExpression) -> Result<String, ModelError> {
    match inner.argument() {
        Argument::Scalar(label) => Ok(label.clone()),
        deeper => serde_json::to_string(deeper)
            .map_err(|err| ModelError::malformed(name, format!("cannot print argument: {err}"))),
    }
}

fn named_type_lines(
    name: &str,
    named_type: &NamedType,
    lines: &mut Vec<String>,
) -> Result<(), ModelError> {
    lines.push(format!("kind: {}", named_type.kind()));

    let separator = if named_type.kind().is_union() { " | " } else { " " };
    let labels = match named_type.argument() {
        Argument::Scalar(label) => vec![label.as_str()],
        Argument::Nested(inner) => vec![alternative_label(name, 0, inner)?],
        Argument::Alternatives(alternatives) => alternatives
            .iter()
            .enumerate()
            .map(|(idx, alternative)| alternative_label(name, idx, alternative))
            .collect::<Result<Vec<_>, _>>()?,
    };

    lines.push(labels.join(separator));
    Ok(())
}

fn alternative_label<'a>(
    name: &str,
    idx: usize,
    alternative: &'a TypeExpression,
) -> Result<&'a str, ModelError> {
    alternative.argument().as_scalar().ok_or_else(|| {
        ModelError::malformed(
            name,
            format!(
                "alternative {idx} of kind `{}` has no label to print",
                alternative.kind()
            ),
        )
    })
}
