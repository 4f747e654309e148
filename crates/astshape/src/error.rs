//! Error types for AstShape operations.
//!
//! This module provides the main error type [`AstShapeError`] which wraps
//! the error conditions of loading, editing and rendering a grammar.

use std::io;

use thiserror::Error;

use astshape_core::ModelError;
use astshape_source::error::SourceError;

/// The main error type for AstShape operations.
///
/// # Diagnostic Variants
///
/// The `Source` variant carries diagnostics with spans together with the
/// text they point into, so callers can print source snippets.
#[derive(Debug, Error)]
pub enum AstShapeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Source { err: SourceError, src: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl AstShapeError {
    /// Create a new `Source` error with the text its diagnostics refer to.
    pub fn new_source_error(err: SourceError, src: impl Into<String>) -> Self {
        Self::Source {
            err,
            src: src.into(),
        }
    }
}
