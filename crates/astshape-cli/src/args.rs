//! Command-line argument definitions for the AstShape CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`], and the [`SetEdit`] value accepted by `--set`.

use std::{fmt, str::FromStr};

use clap::Parser;

use astshape::model::{Argument, TypeExpression, TypeKind};

/// Command-line arguments for the AstShape grammar tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the grammar model (JSON)
    #[arg(help = "Path to the grammar file")]
    pub grammar: String,

    /// Entries to render; every entry when none is given
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,

    /// Attribute-ordering hint file, overriding the configured one
    #[arg(long)]
    pub order: Option<String>,

    /// Attribute edit applied before rendering, in order of appearance
    #[arg(long = "set", value_name = "NAME.ATTR=VALUE")]
    pub set: Vec<SetEdit>,

    /// Write the rendering to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// One `--set NAME.ATTR=VALUE` edit.
///
/// `VALUE` is either a bare label, set as the attribute's argument, or
/// `kind:Label`, set as a nested `{kind, argument: Label}` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetEdit {
    pub name: String,
    pub attribute: String,
    pub argument: Argument,
}

impl FromStr for SetEdit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (target, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected NAME.ATTR=VALUE, got `{s}`"))?;
        let (name, attribute) = target
            .split_once('.')
            .ok_or_else(|| format!("expected NAME.ATTR before `=`, got `{target}`"))?;

        if name.is_empty() || attribute.is_empty() {
            return Err(format!("entry and attribute names must not be empty in `{s}`"));
        }

        let argument = match value.split_once(':') {
            Some((kind, label)) if !kind.is_empty() && !label.is_empty() => {
                Argument::from(TypeExpression::scalar(TypeKind::from(kind), label))
            }
            Some(_) => return Err(format!("expected kind:Label, got `{value}`")),
            None if value.is_empty() => return Err(format!("missing value in `{s}`")),
            None => Argument::from(value),
        };

        Ok(Self {
            name: name.to_string(),
            attribute: attribute.to_string(),
            argument,
        })
    }
}

impl fmt::Display for SetEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}=", self.name, self.attribute)?;
        match &self.argument {
            Argument::Nested(inner) => match inner.argument().as_scalar() {
                Some(label) => write!(f, "{}:{label}", inner.kind()),
                None => write!(f, "{}:?", inner.kind()),
            },
            argument => write!(f, "{}", argument.as_scalar().unwrap_or("?")),
        }
    }
}
