//! The error type of a CLI run.

use std::io;

use thiserror::Error;

use astshape::AstShapeError;

use crate::config::ConfigError;

/// Everything that can end a CLI run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    AstShape(#[from] AstShapeError),
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self::AstShape(AstShapeError::Io(err))
    }
}
