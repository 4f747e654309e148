//! Error and diagnostic system for grammar sources.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Labeled spans into the grammar or hint text
//! - Severity levels
//! - Diagnostic collector for accumulating multiple errors
//!
//! # Overview
//!
//! A [`Diagnostic`] is a single error or warning with an optional error
//! code, labeled source locations and help text. One or more diagnostics are
//! wrapped in a [`SourceError`] when loading fails.
//!
//! # Example
//!
//! ```
//! # use astshape_source::error::{Diagnostic, ErrorCode};
//! # use astshape_source::Span;
//!
//! let diag = Diagnostic::error("entry `Function` has an invalid shape")
//!     .with_code(ErrorCode::E100)
//!     .with_label(Span::new(12..22), "defined here")
//!     .with_help("a node needs `parents`, `children` and `attributes`");
//! assert_eq!(diag.to_string(), "error[E100]: entry `Function` has an invalid shape");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod source_error;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::{Diagnostic, Label, LabelRole, Severity};
pub use error_code::ErrorCode;
pub use source_error::SourceError;
