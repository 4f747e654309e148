//! AstShape - load, inspect, edit and render AST grammar meta-models.
//!
//! A grammar meta-model describes the node types and named types of an
//! abstract syntax tree. This crate loads one from its JSON form, lets it be
//! queried and edited by name, and renders entries as plain text for
//! inspection.

pub mod config;

mod error;

pub use astshape_core::{
    ModelError, edit,
    error::{ShapeViolation, TypeInvariantError},
    model, navigate, render, shape,
};
pub use astshape_source::error::{Diagnostic, ErrorCode, SourceError};

pub use error::AstShapeError;

use std::{fs, path::Path};

use log::{debug, info, warn};

use astshape_core::{
    edit::UpsertOutcome,
    model::{Argument, GrammarModel, TypeExpression},
    navigate::{Resolution, resolve, resolve_mut},
    render::Renderer,
    shape::{Shape, classify},
};
use astshape_source::{GrammarSource, JsonGrammarSource, Origin};

use config::AppConfig;

/// The single owner of a loaded grammar model.
///
/// Every query borrows the session and every edit borrows it mutably, so an
/// edit is visible to the next render without any synchronization.
///
/// # Examples
///
/// ```rust
/// use astshape::{Session, config::AppConfig};
///
/// let grammar = r#"{
///     "nodes": {
///         "Function": {
///             "parents": ["Node"],
///             "children": [],
///             "attributes": [
///                 { "name": "isAsync", "type": { "kind": "value", "argument": "boolean" } }
///             ]
///         }
///     },
///     "namedTypes": {}
/// }"#;
///
/// let mut session = Session::load(&AppConfig::default(), grammar, None)
///     .expect("Failed to load grammar");
///
/// session.upsert("Function", "params", "List").expect("Failed to edit");
///
/// let text = session.render("Function").expect("Failed to render");
/// assert_eq!(text, "Function\nisAsync : boolean\nparams : List\n\n");
/// ```
#[derive(Debug)]
pub struct Session {
    model: GrammarModel,
    renderer: Renderer,
    warnings: Vec<Diagnostic>,
}

impl Session {
    /// Create a session over an already built model.
    pub fn new(model: GrammarModel, config: &AppConfig) -> Self {
        Self {
            model,
            renderer: Renderer::new((*config.render()).into()),
            warnings: Vec::new(),
        }
    }

    /// Load a session from grammar JSON and optional attribute-ordering hints.
    ///
    /// Hint warnings are logged and kept in [`Session::warnings`]. With
    /// `strict_order` set they fail loading instead.
    ///
    /// # Errors
    ///
    /// Returns [`AstShapeError::Source`] with the text the diagnostics point
    /// into when either input is rejected.
    pub fn load(
        config: &AppConfig,
        grammar: &str,
        attribute_order: Option<&str>,
    ) -> Result<Self, AstShapeError> {
        info!(hints = attribute_order.is_some(); "Loading grammar");

        let mut source = JsonGrammarSource::new(grammar);
        if let Some(hints) = attribute_order {
            source = source.with_attribute_order(hints);
        }

        let loaded = source.load().map_err(|err| {
            let src = match err.origin() {
                Origin::Grammar => grammar,
                Origin::AttributeOrder => attribute_order.unwrap_or_default(),
            };
            AstShapeError::new_source_error(err.into_error(), src)
        })?;
        let (model, warnings) = loaded.into_parts();

        if !warnings.is_empty() && config.source().strict_order() {
            let errors = warnings.into_iter().map(Diagnostic::into_error).collect();
            return Err(AstShapeError::new_source_error(
                SourceError::new(errors),
                attribute_order.unwrap_or_default(),
            ));
        }
        for warning in &warnings {
            warn!(warning:% = warning; "Attribute order hint ignored");
        }

        let mut session = Self::new(model, config);
        session.warnings = warnings;
        info!(
            nodes = session.model.nodes().len(),
            named_types = session.model.named_types().len();
            "Session ready"
        );
        Ok(session)
    }

    /// Load a session from a grammar file, reading the hint file named in
    /// the configuration if there is one.
    ///
    /// # Errors
    ///
    /// Returns [`AstShapeError::Io`] when a file cannot be read, otherwise
    /// see [`Session::load`].
    pub fn open(config: &AppConfig, grammar_path: &Path) -> Result<Self, AstShapeError> {
        debug!(path:? = grammar_path; "Reading grammar file");
        let grammar = fs::read_to_string(grammar_path)?;

        let hints = config
            .source()
            .attribute_order()
            .map(|path| {
                debug!(path:? = path; "Reading attribute order file");
                fs::read_to_string(path)
            })
            .transpose()?;

        Self::load(config, &grammar, hints.as_deref())
    }

    /// Returns the warnings raised while loading.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Returns the model.
    pub fn model(&self) -> &GrammarModel {
        &self.model
    }

    /// Gives up the session, keeping the model.
    pub fn into_model(self) -> GrammarModel {
        self.model
    }

    /// Returns every entry name, nodes first, each in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.model.names()
    }

    /// Resolves `name`, preferring a node over a named type.
    pub fn resolve(&self, name: &str) -> Resolution<'_> {
        resolve(&self.model, name)
    }

    /// Classifies the entry registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidEntryShape`] for an unknown name.
    pub fn shape_of(&self, name: &str) -> Result<Shape, AstShapeError> {
        Ok(classify(name, self.resolve(name).entry())?)
    }

    /// Renders the entry registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidEntryShape`] for an unknown name and
    /// [`ModelError::MalformedTypeExpression`] for an unprintable argument.
    pub fn render(&self, name: &str) -> Result<String, AstShapeError> {
        let resolution = self.resolve(name);
        Ok(self.renderer.render(resolution.name(), resolution.entry())?)
    }

    /// Renders every entry in [`Session::names`] order.
    ///
    /// # Errors
    ///
    /// Fails on the first entry that cannot be rendered; see [`Session::render`].
    pub fn render_all(&self) -> Result<String, AstShapeError> {
        let mut output = String::new();
        for name in self.names() {
            output.push_str(&self.render(name)?);
        }
        Ok(output)
    }

    /// Sets the argument of `attribute` on the entry `name`, appending the
    /// attribute when it is missing.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidEntryShape`] for an unknown name and
    /// [`ModelError::InvalidTypeExpression`] when the resulting type would
    /// break a type invariant. The model is unchanged in both cases.
    pub fn upsert(
        &mut self,
        name: &str,
        attribute: &str,
        argument: impl Into<Argument>,
    ) -> Result<UpsertOutcome, AstShapeError> {
        let (name, entry) = resolve_mut(&mut self.model, name).into_parts();
        Ok(edit::upsert(&name, entry, attribute, argument.into())?)
    }

    /// Sets the full type of `attribute` on the entry `name`, appending the
    /// attribute when it is missing.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidEntryShape`] for an unknown name and
    /// [`ModelError::InvalidTypeExpression`] when the resulting type would
    /// break a type invariant. The model is unchanged in both cases.
    pub fn upsert_expression(
        &mut self,
        name: &str,
        attribute: &str,
        ty: TypeExpression,
    ) -> Result<UpsertOutcome, AstShapeError> {
        let (name, entry) = resolve_mut(&mut self.model, name).into_parts();
        Ok(edit::upsert_expression(&name, entry, attribute, ty)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{RenderConfig, SourceConfig},
        model::TypeKind,
    };

    const GRAMMAR: &str = r#"{
        "nodes": {
            "Function": {
                "parents": ["Node"],
                "children": [],
                "attributes": [
                    { "name": "isAsync", "type": { "kind": "value", "argument": "boolean" } },
                    { "name": "body", "type": { "kind": "node", "argument": "FunctionBody" } }
                ]
            },
            "Program": { "parents": [], "children": ["Script"], "attributes": [] }
        },
        "namedTypes": {
            "Binding": {
                "kind": "union",
                "argument": [
                    { "kind": "node", "argument": "BindingIdentifier" },
                    { "kind": "namedType", "argument": "BindingPattern" }
                ]
            }
        }
    }"#;

    fn session() -> Session {
        Session::load(&AppConfig::default(), GRAMMAR, None).unwrap()
    }

    #[test]
    fn test_names_and_shapes() {
        let session = session();
        assert_eq!(
            session.names().collect::<Vec<_>>(),
            vec!["Function", "Program", "Binding"]
        );
        assert_eq!(session.shape_of("Function").unwrap(), Shape::Node);
        assert_eq!(session.shape_of("Binding").unwrap(), Shape::NamedType);
        assert!(matches!(
            session.shape_of("Nope"),
            Err(AstShapeError::Model(ModelError::InvalidEntryShape { .. }))
        ));
    }

    #[test]
    fn test_render_all_concatenates_in_order() {
        let output = session().render_all().unwrap();
        assert_eq!(
            output,
            "Function\nisAsync : boolean\nbody : FunctionBody\n\n\
             Program\nno attributes, children:\nScript\n\n\
             Binding\nkind: union\nBindingIdentifier | BindingPattern\n\n"
        );
    }

    #[test]
    fn test_render_options_follow_config() {
        let config = AppConfig::new(SourceConfig::default(), RenderConfig::new(false, false));
        let session = Session::load(&config, GRAMMAR, None).unwrap();
        assert_eq!(session.render("Program").unwrap(), "Program\n");
    }

    #[test]
    fn test_upsert_expression_on_named_type_properties() {
        let mut session = session();
        let outcome = session
            .upsert_expression("Binding", "doc", TypeExpression::scalar(TypeKind::Value, "string"))
            .unwrap();
        assert_eq!(outcome, UpsertOutcome::Appended { index: 0 });

        let binding = session.model().named_type("Binding").unwrap();
        assert_eq!(binding.properties()[0].name(), "doc");
        // Properties are not part of the rendering.
        assert_eq!(
            session.render("Binding").unwrap(),
            "Binding\nkind: union\nBindingIdentifier | BindingPattern\n\n"
        );
    }

    #[test]
    fn test_strict_order_turns_warnings_into_errors() {
        let hints = "Function\n  missing\n";

        let lenient = Session::load(&AppConfig::default(), GRAMMAR, Some(hints)).unwrap();
        assert_eq!(lenient.warnings().len(), 1);

        let strict = AppConfig::new(SourceConfig::new(None, true), RenderConfig::default());
        let err = Session::load(&strict, GRAMMAR, Some(hints)).unwrap_err();
        let AstShapeError::Source { err, src } = err else {
            panic!("expected a source error");
        };
        assert_eq!(src, hints);
        assert!(err.diagnostics()[0].severity().is_error());
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::W301));
    }

    #[test]
    fn test_source_error_carries_the_offending_text() {
        let err = Session::load(&AppConfig::default(), GRAMMAR, Some("  orphan\n")).unwrap_err();
        assert!(matches!(err, AstShapeError::Source { ref src, .. } if src == "  orphan\n"));

        let err = Session::load(&AppConfig::default(), "{", None).unwrap_err();
        assert!(matches!(err, AstShapeError::Source { ref src, .. } if src == "{"));
    }
}
