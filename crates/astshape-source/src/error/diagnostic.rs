//! Diagnostics: a message with a severity, an optional code, help text and
//! labeled spans into the text it was raised for.

use std::fmt;

use crate::{error::error_code::ErrorCode, span::Span};

/// How serious a diagnostic is. Any [`Severity::Error`] stops loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Returns `true` for [`Severity::Error`].
    pub fn is_error(&self) -> bool {
        *self == Severity::Error
    }

    /// Returns `true` for [`Severity::Warning`].
    pub fn is_warning(&self) -> bool {
        *self == Severity::Warning
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

/// Whether a label marks the problem itself or only adds context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRole {
    Primary,
    Secondary,
}

/// A message attached to a span of the source text.
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    role: LabelRole,
}

impl Label {
    fn new(span: Span, message: impl Into<String>, role: LabelRole) -> Self {
        Self {
            span,
            message: message.into(),
            role,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn role(&self) -> LabelRole {
        self.role
    }

    pub fn is_primary(&self) -> bool {
        self.role == LabelRole::Primary
    }

    pub fn is_secondary(&self) -> bool {
        self.role == LabelRole::Secondary
    }
}

/// A diagnostic message with optional source locations.
///
/// # Example
///
/// ```text
/// error[E106]: attribute `body` of `Function` is defined twice
///   --> grammar.json:12:9
///    |
/// 12 |         { "name": "body", "type": ... },
///    |         ^^^^^^ duplicate attribute
///    |
///    = help: attribute names must be unique within a node
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::new(span, message, LabelRole::Primary));
        self
    }

    /// Add a primary label if a span is known.
    pub fn with_optional_label(self, span: Option<Span>, message: impl Into<String>) -> Self {
        match span {
            Some(span) => self.with_label(span, message),
            None => self,
        }
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::new(span, message, LabelRole::Secondary));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Turn this diagnostic into an error, keeping everything else.
    pub fn into_error(mut self) -> Self {
        self.severity = Severity::Error;
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{}[{code}]: {}", self.severity, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_error() {
        let diag = Diagnostic::error("test error");

        assert!(diag.severity().is_error());
        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_diagnostic_builders() {
        let diag = Diagnostic::error("duplicate attribute")
            .with_code(ErrorCode::E106)
            .with_label(Span::new(10..20), "duplicate here")
            .with_secondary_label(Span::new(2..8), "first defined here")
            .with_help("rename one of them");

        assert_eq!(diag.code(), Some(ErrorCode::E106));
        assert_eq!(diag.labels().len(), 2);
        assert!(diag.labels()[0].is_primary());
        assert!(diag.labels()[1].is_secondary());
        assert_eq!(diag.help(), Some("rename one of them"));
    }

    #[test]
    fn test_optional_label() {
        let diag = Diagnostic::warning("w").with_optional_label(None, "nowhere");
        assert!(diag.labels().is_empty());

        let diag = Diagnostic::warning("w").with_optional_label(Some(Span::new(0..1)), "here");
        assert_eq!(diag.labels().len(), 1);
    }

    #[test]
    fn test_into_error() {
        let diag = Diagnostic::warning("unknown node").into_error();
        assert!(diag.severity().is_error());
    }

    #[test]
    fn test_label_roles() {
        let diag = Diagnostic::error("e")
            .with_label(Span::new(10..20), "error here")
            .with_secondary_label(Span::new(5..15), "first listed here");

        let [primary, secondary] = diag.labels() else {
            panic!("expected two labels");
        };
        assert_eq!(primary.role(), LabelRole::Primary);
        assert_eq!(primary.span(), Span::new(10..20));
        assert_eq!(primary.message(), "error here");
        assert!(secondary.is_secondary());
        assert!(!secondary.is_primary());
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::warning("unknown node `Nope`").with_code(ErrorCode::W300);
        assert_eq!(diag.to_string(), "warning[W300]: unknown node `Nope`");

        let diag = Diagnostic::error("bad");
        assert_eq!(diag.to_string(), "error: bad");
    }
}
