//! Loading a grammar model from its JSON form.
//!
//! Every raw entry is classified by its fields before it is converted into a
//! typed entry, and every problem found is reported in one pass. Nothing is
//! built unless the whole document is clean.

use indexmap::IndexMap;
use log::{debug, info};
use serde_json::{Map, Value};

use astshape_core::{
    ModelError,
    error::{ShapeViolation, TypeInvariantError},
    model::{Attribute, GrammarModel, NamedType, Node, TypeExpression},
    shape::{Shape, ShapeProbe},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, SourceError},
    span::Span,
};

const NODES: &str = "nodes";
const NAMED_TYPES: &str = "namedTypes";

/// Loads a [`GrammarModel`] from a JSON document.
///
/// # Errors
///
/// Returns a [`SourceError`] holding every diagnostic found when the
/// document is not valid JSON, lacks a collection, or contains an entry that
/// is misshapen, misplaced or violates a type-expression invariant.
pub fn load_grammar(source: &str) -> Result<GrammarModel, SourceError> {
    let document: Value = serde_json::from_str(source).map_err(|err| json_syntax(source, &err))?;

    let mut collector = DiagnosticCollector::new();
    let raw_nodes = collection(source, &document, NODES, &mut collector);
    let raw_named_types = collection(source, &document, NAMED_TYPES, &mut collector);

    let mut loader = Loader { source, collector };

    let nodes: IndexMap<String, Node> = raw_nodes
        .into_iter()
        .flatten()
        .filter_map(|(name, raw)| loader.node(name, raw).map(|node| (name.clone(), node)))
        .collect();
    let named_types: IndexMap<String, NamedType> = raw_named_types
        .into_iter()
        .flatten()
        .filter_map(|(name, raw)| {
            loader
                .named_type(name, raw)
                .map(|named_type| (name.clone(), named_type))
        })
        .collect();

    loader.collector.finish()?;

    info!(
        nodes = nodes.len(),
        named_types = named_types.len();
        "Grammar loaded"
    );
    Ok(GrammarModel::new(nodes, named_types))
}

struct Loader<'s> {
    source: &'s str,
    collector: DiagnosticCollector,
}

impl Loader<'_> {
    fn node(&mut self, name: &str, raw: &Value) -> Option<Node> {
        self.expect_shape(name, raw, Shape::Node)?;

        let node: Node = self.convert(name, raw)?;
        let mut clean = true;
        for attribute in node.attributes() {
            clean &= self.check_expression(name, Some(attribute), attribute.ty());
        }
        if let Some(duplicate) = node.duplicate_attribute() {
            let diagnostic = Diagnostic::error(format!(
                "attribute `{duplicate}` of `{name}` is defined more than once"
            ))
            .with_code(ErrorCode::E106)
            .with_optional_label(self.key_span(name), "in this node")
            .with_help("attribute names must be unique within a node");
            self.collector.emit(diagnostic);
            clean = false;
        }

        clean.then_some(node)
    }

    fn named_type(&mut self, name: &str, raw: &Value) -> Option<NamedType> {
        self.expect_shape(name, raw, Shape::NamedType)?;

        let named_type: NamedType = self.convert(name, raw)?;
        self.check_expression(name, None, named_type.expression())
            .then_some(named_type)
    }

    /// Classifies `raw` and checks it sits in the collection for `expected`.
    fn expect_shape(&mut self, name: &str, raw: &Value, expected: Shape) -> Option<()> {
        let shape = match probe(raw).classify(name) {
            Ok(shape) => shape,
            Err(err) => {
                let diagnostic = self.shape_diagnostic(&err);
                self.collector.emit(diagnostic);
                return None;
            }
        };

        if shape != expected {
            let target = match shape {
                Shape::Node => NODES,
                Shape::NamedType => NAMED_TYPES,
            };
            let diagnostic = Diagnostic::error(format!(
                "`{name}` is shaped like a {shape} but is listed as a {expected}"
            ))
            .with_code(ErrorCode::E102)
            .with_optional_label(self.key_span(name), "misplaced entry")
            .with_help(format!("move it to `{target}`"));
            self.collector.emit(diagnostic);
            return None;
        }

        debug!(name, shape:% = shape; "Accepted entry");
        Some(())
    }

    fn convert<T: serde::de::DeserializeOwned>(&mut self, name: &str, raw: &Value) -> Option<T> {
        match serde_json::from_value(raw.clone()) {
            Ok(value) => Some(value),
            Err(err) => {
                let diagnostic =
                    Diagnostic::error(format!("entry `{name}` has invalid fields: {err}"))
                        .with_code(ErrorCode::E103)
                        .with_optional_label(self.key_span(name), "in this entry");
                self.collector.emit(diagnostic);
                None
            }
        }
    }

    fn check_expression(
        &mut self,
        name: &str,
        attribute: Option<&Attribute>,
        expression: &TypeExpression,
    ) -> bool {
        let Err(err) = expression.check_invariants() else {
            return true;
        };

        let code = match err {
            TypeInvariantError::UnionArity { .. } => ErrorCode::E104,
            TypeInvariantError::UnexpectedAlternatives { .. } => ErrorCode::E105,
        };
        let location = match attribute {
            Some(attribute) => format!("attribute `{}` of `{name}`", attribute.name()),
            None => format!("`{name}`"),
        };
        let diagnostic = Diagnostic::error(format!("type of {location} is malformed: {err}"))
            .with_code(code)
            .with_optional_label(self.key_span(name), "in this entry");
        self.collector.emit(diagnostic);
        false
    }

    fn shape_diagnostic(&self, err: &ModelError) -> Diagnostic {
        let code = match err {
            ModelError::InvalidEntryShape {
                reason: ShapeViolation::Ambiguous,
                ..
            } => ErrorCode::E101,
            _ => ErrorCode::E100,
        };

        Diagnostic::error(err.to_string())
            .with_code(code)
            .with_optional_label(self.key_span(err.entry_name()), "defined here")
            .with_help(
                "a node needs `parents`, `children` and `attributes`; \
                 a named type needs `kind` and `argument`",
            )
    }

    fn key_span(&self, name: &str) -> Option<Span> {
        Span::of_json_key(self.source, name)
    }
}

/// Records which shape-relevant fields `raw` carries. `null` counts as absent.
fn probe(raw: &Value) -> ShapeProbe {
    let has = |field: &str| {
        raw.as_object()
            .and_then(|object| object.get(field))
            .is_some_and(|value| !value.is_null())
    };

    ShapeProbe {
        parents: has("parents"),
        children: has("children"),
        attributes: has("attributes"),
        kind: has("kind"),
        argument: has("argument"),
    }
}

fn collection<'d>(
    source: &str,
    document: &'d Value,
    key: &str,
    collector: &mut DiagnosticCollector,
) -> Option<&'d Map<String, Value>> {
    let found = document.get(key).and_then(Value::as_object);
    if found.is_none() {
        collector.emit(
            Diagnostic::error(format!("grammar document has no `{key}` object"))
                .with_code(ErrorCode::E002)
                .with_optional_label(Span::of_json_key(source, key), "not an object")
                .with_help(format!(
                    "the top level needs both `{NODES}` and `{NAMED_TYPES}` objects"
                )),
        );
    }
    found
}

fn json_syntax(source: &str, err: &serde_json::Error) -> SourceError {
    let span = Span::at_line_column(source, err.line(), err.column());
    Diagnostic::error(format!("grammar document is not valid JSON: {err}"))
        .with_code(ErrorCode::E001)
        .with_label(span, "here")
        .into()
}

#[cfg(test)]
mod tests {
    use astshape_core::model::{Argument, TypeKind};

    use super::*;

    fn codes(err: &SourceError) -> Vec<ErrorCode> {
        err.diagnostics()
            .iter()
            .filter_map(Diagnostic::code)
            .collect()
    }

    #[test]
    fn test_load_minimal_grammar() {
        let source = r#"{
            "nodes": {
                "Function": {
                    "parents": ["Node"],
                    "children": ["isAsync", "body"],
                    "attributes": [
                        {"name": "isAsync", "type": {"kind": "value", "argument": "boolean"}},
                        {"name": "body", "type": {"kind": "node", "argument": "FunctionBody"}}
                    ]
                }
            },
            "namedTypes": {
                "BindingPattern": {
                    "kind": "union",
                    "argument": [
                        {"kind": "node", "argument": "ObjectBinding"},
                        {"kind": "node", "argument": "ArrayBinding"}
                    ]
                }
            }
        }"#;

        let model = load_grammar(source).unwrap();

        let function = model.node("Function").unwrap();
        assert_eq!(function.parents(), ["Node".to_string()]);
        assert_eq!(function.attributes().len(), 2);
        assert_eq!(function.attributes()[1].ty().kind(), &TypeKind::Node);

        let pattern = model.named_type("BindingPattern").unwrap();
        assert!(pattern.kind().is_union());
        assert!(matches!(pattern.argument(), Argument::Alternatives(alts) if alts.len() == 2));
    }

    #[test]
    fn test_load_union_of_bare_labels() {
        let source = r#"{"nodes": {}, "namedTypes": {
            "Choice": {"kind": "union", "argument": ["A", "B", "C"]},
            "Lonely": {"kind": "union", "argument": ["A"]}
        }}"#;

        let err = load_grammar(source).unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E104]);

        let source = r#"{"nodes": {}, "namedTypes": {
            "Choice": {"kind": "union", "argument": ["A", "B", "C"]}
        }}"#;
        let model = load_grammar(source).unwrap();
        let choice = model.named_type("Choice").unwrap();
        assert!(matches!(choice.argument(), Argument::Alternatives(alts) if alts.len() == 3));
    }

    #[test]
    fn test_load_keeps_definition_order() {
        let source = r#"{"nodes": {
            "Zeta": {"parents": [], "children": [], "attributes": []},
            "Alpha": {"parents": [], "children": [], "attributes": []}
        }, "namedTypes": {}}"#;

        let model = load_grammar(source).unwrap();

        let names: Vec<_> = model.names().collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_invalid_json() {
        let err = load_grammar("{ \"nodes\": ").unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E001]);
        assert_eq!(err.diagnostics()[0].labels().len(), 1);
    }

    #[test]
    fn test_missing_collections() {
        let err = load_grammar("{}").unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E002, ErrorCode::E002]);
    }

    #[test]
    fn test_unrecognized_and_ambiguous_shapes_are_all_reported() {
        let source = r#"{"nodes": {
            "Broken": {"parents": [], "attributes": []},
            "Both": {"parents": [], "children": [], "attributes": [], "kind": "node", "argument": "X"}
        }, "namedTypes": {
            "Half": {"kind": "union"}
        }}"#;

        let err = load_grammar(source).unwrap_err();

        assert_eq!(
            codes(&err),
            vec![ErrorCode::E100, ErrorCode::E101, ErrorCode::E100]
        );
        let broken = &err.diagnostics()[0];
        assert_eq!(broken.labels().len(), 1);
    }

    #[test]
    fn test_null_fields_count_as_absent() {
        let source = r#"{"nodes": {}, "namedTypes": {
            "Nothing": {"kind": "node", "argument": null}
        }}"#;

        let err = load_grammar(source).unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E100]);
    }

    #[test]
    fn test_misplaced_entry() {
        let source = r#"{"nodes": {
            "Label": {"kind": "value", "argument": "string"}
        }, "namedTypes": {}}"#;

        let err = load_grammar(source).unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E102]);
    }

    #[test]
    fn test_invalid_fields() {
        let source = r#"{"nodes": {
            "Function": {"parents": "Node", "children": [], "attributes": []}
        }, "namedTypes": {}}"#;

        let err = load_grammar(source).unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E103]);
    }

    #[test]
    fn test_type_invariants() {
        let source = r#"{"nodes": {
            "Function": {"parents": [], "children": [], "attributes": [
                {"name": "params", "type": {"kind": "list", "argument": [
                    {"kind": "node", "argument": "A"}
                ]}}
            ]}
        }, "namedTypes": {
            "Lonely": {"kind": "union", "argument": [{"kind": "node", "argument": "A"}]}
        }}"#;

        let err = load_grammar(source).unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E105, ErrorCode::E104]);
    }

    #[test]
    fn test_duplicate_attribute() {
        let source = r#"{"nodes": {
            "Function": {"parents": [], "children": [], "attributes": [
                {"name": "body", "type": {"kind": "node", "argument": "A"}},
                {"name": "body", "type": {"kind": "node", "argument": "B"}}
            ]}
        }, "namedTypes": {}}"#;

        let err = load_grammar(source).unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E106]);
        assert!(err.diagnostics()[0].message().contains("`body`"));
    }
}
