//! The grammar model: node definitions, named types and type expressions.
//!
//! A [`GrammarModel`] holds two independent name-keyed collections. Nodes and
//! named types live in separate namespaces, so the same name may appear in
//! both; [`navigate::resolve`](crate::navigate::resolve) gives nodes precedence.
//!
//! All collections preserve definition order, which is also display order.
//!
//! # Example
//!
//! ```
//! use astshape_core::model::{Argument, Attribute, GrammarModel, NamedType, Node, TypeExpression, TypeKind};
//!
//! let mut model = GrammarModel::default();
//! model.insert_node(
//!     "Identifier",
//!     Node::new(vec!["Node".into()], vec![], vec![Attribute::new(
//!         "name",
//!         TypeExpression::scalar(TypeKind::Value, "string"),
//!     )]),
//! );
//! model.insert_named_type(
//!     "Label",
//!     NamedType::new(TypeExpression::scalar(TypeKind::Value, "string")),
//! );
//!
//! assert!(model.node("Identifier").is_some());
//! assert!(model.named_type("Label").is_some());
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{error::TypeInvariantError, shape::Shape};

/// The tag of a [`TypeExpression`].
///
/// The set of kinds is open: the grammar format may introduce kinds this
/// crate has no dedicated variant for, which are kept as [`TypeKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeKind {
    /// A primitive value such as `boolean` or `string`.
    Value,
    /// A reference to a node definition.
    Node,
    /// A reference to a named type.
    NamedType,
    /// The argument may be absent.
    Nullable,
    /// A sequence of the argument.
    List,
    /// One of several alternatives.
    Union,
    /// No kind was recorded, e.g. for attributes appended with a bare argument.
    #[default]
    Unspecified,
    /// A kind without a dedicated variant.
    Other(String),
}

impl TypeKind {
    /// Returns the textual tag of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            TypeKind::Value => "value",
            TypeKind::Node => "node",
            TypeKind::NamedType => "namedType",
            TypeKind::Nullable => "nullable",
            TypeKind::List => "list",
            TypeKind::Union => "union",
            TypeKind::Unspecified => "unspecified",
            TypeKind::Other(kind) => kind,
        }
    }

    /// Returns `true` for [`TypeKind::Union`].
    pub fn is_union(&self) -> bool {
        matches!(self, TypeKind::Union)
    }
}

impl From<&str> for TypeKind {
    fn from(value: &str) -> Self {
        match value {
            "value" => TypeKind::Value,
            "node" => TypeKind::Node,
            "namedType" => TypeKind::NamedType,
            "nullable" => TypeKind::Nullable,
            "list" => TypeKind::List,
            "union" => TypeKind::Union,
            "unspecified" => TypeKind::Unspecified,
            other => TypeKind::Other(other.to_string()),
        }
    }
}

impl From<String> for TypeKind {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<TypeKind> for String {
    fn from(value: TypeKind) -> Self {
        match value {
            TypeKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The argument of a [`TypeExpression`].
///
/// When read from JSON, an alternative may be written as a bare label; it is
/// kept as a scalar expression of kind [`TypeKind::Unspecified`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Argument {
    /// A primitive label naming a type, e.g. `"BindingPattern"`.
    Scalar(String),
    /// A single nested expression, used by unary kinds.
    Nested(Box<TypeExpression>),
    /// Ordered alternatives of a union.
    Alternatives(Vec<TypeExpression>),
}

impl Argument {
    /// Returns the label if this is a [`Argument::Scalar`].
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Argument::Scalar(label) => Some(label),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Argument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawArgument::deserialize(deserializer).map(Argument::from)
    }
}

/// Wire form of [`Argument`]. Arrays are tried before objects so that a
/// list of labels is never read as a struct in sequence form.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawArgument {
    Scalar(String),
    Alternatives(Vec<RawAlternative>),
    Nested(Box<TypeExpression>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAlternative {
    Label(String),
    Expression(TypeExpression),
}

impl From<RawArgument> for Argument {
    fn from(raw: RawArgument) -> Self {
        match raw {
            RawArgument::Scalar(label) => Argument::Scalar(label),
            RawArgument::Nested(inner) => Argument::Nested(inner),
            RawArgument::Alternatives(alternatives) => Argument::Alternatives(
                alternatives
                    .into_iter()
                    .map(|alternative| match alternative {
                        RawAlternative::Label(label) => {
                            TypeExpression::scalar(TypeKind::Unspecified, label)
                        }
                        RawAlternative::Expression(expr) => expr,
                    })
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Argument {
    fn from(label: &str) -> Self {
        Argument::Scalar(label.to_string())
    }
}

impl From<String> for Argument {
    fn from(label: String) -> Self {
        Argument::Scalar(label)
    }
}

impl From<TypeExpression> for Argument {
    fn from(expr: TypeExpression) -> Self {
        Argument::Nested(Box::new(expr))
    }
}

/// A tagged description of a type: a `kind` plus an `argument`.
///
/// Type expressions are immutable once built. [`edit::upsert`](crate::edit::upsert)
/// replaces an attribute's expression as a whole, after checking it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeExpression {
    #[serde(default)]
    kind: TypeKind,
    argument: Argument,
}

impl TypeExpression {
    /// Creates a type expression from a kind and an argument.
    pub fn new(kind: TypeKind, argument: Argument) -> Self {
        Self { kind, argument }
    }

    /// Creates a type expression whose argument is a scalar label.
    pub fn scalar(kind: TypeKind, label: impl Into<String>) -> Self {
        Self::new(kind, Argument::Scalar(label.into()))
    }

    /// Creates a unary type expression wrapping `inner`.
    pub fn nested(kind: TypeKind, inner: TypeExpression) -> Self {
        Self::new(kind, Argument::Nested(Box::new(inner)))
    }

    /// Creates a union of `alternatives`.
    ///
    /// # Errors
    ///
    /// Returns [`TypeInvariantError::UnionArity`] when fewer than two
    /// alternatives are given.
    pub fn union(alternatives: Vec<TypeExpression>) -> Result<Self, TypeInvariantError> {
        let expr = Self::new(TypeKind::Union, Argument::Alternatives(alternatives));
        expr.check_invariants()?;
        Ok(expr)
    }

    /// Returns the kind tag.
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Returns the argument.
    pub fn argument(&self) -> &Argument {
        &self.argument
    }

    /// Checks that the argument's shape agrees with the kind, recursively.
    ///
    /// A union carries at least two alternatives; any other kind carries a
    /// scalar or a single nested expression.
    pub fn check_invariants(&self) -> Result<(), TypeInvariantError> {
        match (&self.kind, &self.argument) {
            (TypeKind::Union, Argument::Alternatives(alternatives)) => {
                if alternatives.len() < 2 {
                    return Err(TypeInvariantError::UnionArity {
                        found: alternatives.len(),
                    });
                }
                alternatives.iter().try_for_each(Self::check_invariants)
            }
            (TypeKind::Union, _) => Err(TypeInvariantError::UnionArity { found: 1 }),
            (kind, Argument::Alternatives(_)) => Err(TypeInvariantError::UnexpectedAlternatives {
                kind: kind.to_string(),
            }),
            (_, Argument::Nested(inner)) => inner.check_invariants(),
            (_, Argument::Scalar(_)) => Ok(()),
        }
    }

}

/// A named, typed field of a [`Node`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    name: String,
    #[serde(rename = "type")]
    ty: TypeExpression,
}

impl Attribute {
    /// Creates an attribute.
    pub fn new(name: impl Into<String>, ty: TypeExpression) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Returns the attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the attribute type.
    pub fn ty(&self) -> &TypeExpression {
        &self.ty
    }

    pub(crate) fn ty_mut(&mut self) -> &mut TypeExpression {
        &mut self.ty
    }
}

/// One AST node shape.
///
/// Supertypes are held by name only; traversal is always a lookup in the
/// owning [`GrammarModel`]. Attribute names are unique within a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    parents: Vec<String>,
    children: Vec<String>,
    attributes: Vec<Attribute>,
}

impl Node {
    /// Creates a node definition.
    pub fn new(parents: Vec<String>, children: Vec<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            parents,
            children,
            attributes,
        }
    }

    /// Returns the supertype names.
    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    /// Returns the structural markers, shown when the node has no attributes.
    pub fn children(&self) -> &[String] {
        &self.children
    }

    /// Returns the attributes in display order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Returns the attribute with the given name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Returns the first attribute name that occurs more than once, if any.
    pub fn duplicate_attribute(&self) -> Option<&str> {
        self.attributes.iter().enumerate().find_map(|(idx, attr)| {
            self.attributes[..idx]
                .iter()
                .any(|earlier| earlier.name == attr.name)
                .then_some(attr.name.as_str())
        })
    }

    /// Moves the attributes named in `order` to the front, in that order.
    ///
    /// Attributes not named keep their relative order behind the hinted
    /// ones. No attribute is added or dropped. Returns the hinted names that
    /// match no attribute of this node.
    pub fn reorder_attributes<S: AsRef<str>>(&mut self, order: &[S]) -> Vec<String> {
        let mut remaining = std::mem::take(&mut self.attributes);
        let mut unknown = Vec::new();

        for hinted in order {
            let hinted = hinted.as_ref();
            match remaining.iter().position(|attr| attr.name == hinted) {
                Some(idx) => self.attributes.push(remaining.remove(idx)),
                None => unknown.push(hinted.to_string()),
            }
        }

        self.attributes.append(&mut remaining);
        unknown
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut Vec<Attribute> {
        &mut self.attributes
    }
}

/// A reusable type expression registered under a name.
///
/// `properties` only exists so that attribute editing can treat both entry
/// shapes uniformly; the canonical grammar gives named types no attribute
/// list of their own, and rendering ignores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedType {
    #[serde(flatten)]
    expression: TypeExpression,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    properties: Vec<Attribute>,
}

impl NamedType {
    /// Creates a named type from its definition.
    pub fn new(expression: TypeExpression) -> Self {
        Self {
            expression,
            properties: Vec::new(),
        }
    }

    /// Returns the defining type expression.
    pub fn expression(&self) -> &TypeExpression {
        &self.expression
    }

    /// Returns the kind of the defining expression.
    pub fn kind(&self) -> &TypeKind {
        self.expression.kind()
    }

    /// Returns the argument of the defining expression.
    pub fn argument(&self) -> &Argument {
        self.expression.argument()
    }

    /// Returns the properties recorded by attribute edits.
    pub fn properties(&self) -> &[Attribute] {
        &self.properties
    }

    pub(crate) fn properties_mut(&mut self) -> &mut Vec<Attribute> {
        &mut self.properties
    }
}

/// A borrowed grammar entry of either shape.
#[derive(Debug, Clone, Copy)]
pub enum Entry<'a> {
    Node(&'a Node),
    NamedType(&'a NamedType),
}

impl Entry<'_> {
    /// Returns the shape of this entry.
    pub fn shape(&self) -> Shape {
        match self {
            Entry::Node(_) => Shape::Node,
            Entry::NamedType(_) => Shape::NamedType,
        }
    }
}

/// A mutably borrowed grammar entry of either shape.
#[derive(Debug)]
pub enum EntryMut<'a> {
    Node(&'a mut Node),
    NamedType(&'a mut NamedType),
}

impl EntryMut<'_> {
    /// Returns the shape of this entry.
    pub fn shape(&self) -> Shape {
        match self {
            EntryMut::Node(_) => Shape::Node,
            EntryMut::NamedType(_) => Shape::NamedType,
        }
    }

    /// Reborrows this entry immutably.
    pub fn as_entry(&self) -> Entry<'_> {
        match self {
            EntryMut::Node(node) => Entry::Node(node),
            EntryMut::NamedType(named_type) => Entry::NamedType(named_type),
        }
    }
}

/// The two name-keyed collections that make up a grammar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarModel {
    nodes: IndexMap<String, Node>,
    #[serde(rename = "namedTypes")]
    named_types: IndexMap<String, NamedType>,
}

impl GrammarModel {
    /// Creates a model from both collections.
    pub fn new(nodes: IndexMap<String, Node>, named_types: IndexMap<String, NamedType>) -> Self {
        Self { nodes, named_types }
    }

    /// Returns all node definitions in definition order.
    pub fn nodes(&self) -> &IndexMap<String, Node> {
        &self.nodes
    }

    /// Returns all named types in definition order.
    pub fn named_types(&self) -> &IndexMap<String, NamedType> {
        &self.named_types
    }

    /// Looks up a node definition.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// Looks up a node definition mutably.
    pub fn node_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.nodes.get_mut(name)
    }

    /// Looks up a named type.
    pub fn named_type(&self, name: &str) -> Option<&NamedType> {
        self.named_types.get(name)
    }

    /// Looks up a named type mutably.
    pub fn named_type_mut(&mut self, name: &str) -> Option<&mut NamedType> {
        self.named_types.get_mut(name)
    }

    /// Registers a node definition, replacing any previous one of that name.
    pub fn insert_node(&mut self, name: impl Into<String>, node: Node) -> Option<Node> {
        self.nodes.insert(name.into(), node)
    }

    /// Registers a named type, replacing any previous one of that name.
    pub fn insert_named_type(
        &mut self,
        name: impl Into<String>,
        named_type: NamedType,
    ) -> Option<NamedType> {
        self.named_types.insert(name.into(), named_type)
    }

    /// Returns every entry name: nodes first, then named types.
    ///
    /// A name defined in both collections appears twice.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes
            .keys()
            .chain(self.named_types.keys())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(name: &str, label: &str) -> Attribute {
        Attribute::new(name, TypeExpression::scalar(TypeKind::Node, label))
    }

    #[test]
    fn test_type_kind_round_trips_through_strings() {
        assert_eq!(TypeKind::from("namedType"), TypeKind::NamedType);
        assert_eq!(TypeKind::from("frozenArray"), TypeKind::Other("frozenArray".into()));
        assert_eq!(String::from(TypeKind::Nullable), "nullable");
        assert_eq!(String::from(TypeKind::Other("enum".into())), "enum");
    }

    #[test]
    fn test_union_requires_two_alternatives() {
        let single = vec![TypeExpression::scalar(TypeKind::Node, "A")];
        assert_eq!(
            TypeExpression::union(single),
            Err(TypeInvariantError::UnionArity { found: 1 })
        );

        let pair = vec![
            TypeExpression::scalar(TypeKind::Node, "A"),
            TypeExpression::scalar(TypeKind::Node, "B"),
        ];
        assert!(TypeExpression::union(pair).is_ok());
    }

    #[test]
    fn test_check_invariants_rejects_alternatives_on_unary_kind() {
        let expr = TypeExpression::new(
            TypeKind::List,
            Argument::Alternatives(vec![TypeExpression::scalar(TypeKind::Node, "A")]),
        );
        assert_eq!(
            expr.check_invariants(),
            Err(TypeInvariantError::UnexpectedAlternatives {
                kind: "list".into()
            })
        );
    }

    #[test]
    fn test_check_invariants_descends_into_nested() {
        let bad_union = TypeExpression::new(TypeKind::Union, Argument::Scalar("A".into()));
        let expr = TypeExpression::nested(TypeKind::List, bad_union);
        assert!(expr.check_invariants().is_err());
    }

    #[test]
    fn test_duplicate_attribute() {
        let node = Node::new(vec![], vec![], vec![attr("a", "A"), attr("b", "B"), attr("a", "C")]);
        assert_eq!(node.duplicate_attribute(), Some("a"));

        let node = Node::new(vec![], vec![], vec![attr("a", "A"), attr("b", "B")]);
        assert_eq!(node.duplicate_attribute(), None);
    }

    #[test]
    fn test_reorder_attributes() {
        let mut node = Node::new(
            vec![],
            vec![],
            vec![attr("body", "B"), attr("name", "N"), attr("isAsync", "V")],
        );

        let unknown = node.reorder_attributes(&["isAsync", "missing", "name"][..]);

        let names: Vec<_> = node.attributes().iter().map(Attribute::name).collect();
        assert_eq!(names, vec!["isAsync", "name", "body"]);
        assert_eq!(unknown, vec!["missing".to_string()]);
    }

    #[test]
    fn test_deserialize_attribute_without_kind() {
        let attr: Attribute =
            serde_json::from_str(r#"{"name": "params", "type": {"argument": "List"}}"#).unwrap();
        assert_eq!(attr.ty().kind(), &TypeKind::Unspecified);
        assert_eq!(attr.ty().argument().as_scalar(), Some("List"));
    }

    #[test]
    fn test_deserialize_named_type_union() {
        let named: NamedType = serde_json::from_str(
            r#"{"kind": "union", "argument": [
                {"kind": "node", "argument": "ObjectBinding"},
                {"kind": "node", "argument": "ArrayBinding"}
            ]}"#,
        )
        .unwrap();

        assert!(named.kind().is_union());
        assert!(matches!(named.argument(), Argument::Alternatives(alts) if alts.len() == 2));
        assert!(named.properties().is_empty());
    }

    #[test]
    fn test_deserialize_union_of_bare_labels() {
        let named: NamedType =
            serde_json::from_str(r#"{"kind": "union", "argument": ["A", "B", "C"]}"#).unwrap();

        let Argument::Alternatives(alternatives) = named.argument() else {
            panic!("expected alternatives");
        };
        let labels: Vec<_> = alternatives
            .iter()
            .map(|alt| alt.argument().as_scalar())
            .collect();
        assert_eq!(labels, vec![Some("A"), Some("B"), Some("C")]);
        assert_eq!(alternatives[0].kind(), &TypeKind::Unspecified);
        assert!(named.expression().check_invariants().is_ok());
    }

    #[test]
    fn test_deserialize_two_labels_as_alternatives() {
        let argument: Argument = serde_json::from_str(r#"["A", "B"]"#).unwrap();
        assert!(matches!(argument, Argument::Alternatives(alts) if alts.len() == 2));

        let mixed: Argument =
            serde_json::from_str(r#"["A", {"kind": "node", "argument": "B"}]"#).unwrap();
        let Argument::Alternatives(alts) = mixed else {
            panic!("expected alternatives");
        };
        assert_eq!(alts[1], TypeExpression::scalar(TypeKind::Node, "B"));
    }

    #[test]
    fn test_names_lists_nodes_before_named_types() {
        let mut model = GrammarModel::default();
        model.insert_named_type("T", NamedType::new(TypeExpression::scalar(TypeKind::Value, "string")));
        model.insert_node("N", Node::default());

        let names: Vec<_> = model.names().collect();
        assert_eq!(names, vec!["N", "T"]);
    }
}
