//! Configuration types for loading and rendering grammars.
//!
//! All types implement [`serde::Deserialize`] so they can be read from a
//! configuration file. Every section and field is optional.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining source and render settings.
//! - [`SourceConfig`] - Where attribute-ordering hints come from and how strictly they apply.
//! - [`RenderConfig`] - Optional parts of the rendered text.
//!
//! # Example
//!
//! ```
//! # use astshape::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.source().attribute_order().is_none());
//! assert!(config.render().trailing_blank_line());
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use astshape_core::render::RenderOptions;

/// Top-level configuration combining source and render settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Source configuration section.
    #[serde(default)]
    source: SourceConfig,

    /// Render configuration section.
    #[serde(default)]
    render: RenderConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(source: SourceConfig, render: RenderConfig) -> Self {
        Self { source, render }
    }

    /// Returns the source configuration.
    pub fn source(&self) -> &SourceConfig {
        &self.source
    }

    /// Returns the render configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    /// Replaces the attribute-ordering hint file.
    pub fn set_attribute_order(&mut self, path: impl Into<PathBuf>) {
        self.source.attribute_order = Some(path.into());
    }
}

/// Attribute-ordering hint settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceConfig {
    /// Hint file applied after the grammar is loaded.
    #[serde(default)]
    attribute_order: Option<PathBuf>,

    /// Treat hint warnings as errors.
    #[serde(default)]
    strict_order: bool,
}

impl SourceConfig {
    /// Creates a new [`SourceConfig`].
    pub fn new(attribute_order: Option<PathBuf>, strict_order: bool) -> Self {
        Self {
            attribute_order,
            strict_order,
        }
    }

    /// Returns the hint file, if one is configured.
    pub fn attribute_order(&self) -> Option<&Path> {
        self.attribute_order.as_deref()
    }

    /// Returns `true` when hint warnings fail loading.
    pub fn strict_order(&self) -> bool {
        self.strict_order
    }
}

/// Switches for the optional parts of the rendered text.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "enabled")]
    children_fallback: bool,

    #[serde(default = "enabled")]
    trailing_blank_line: bool,
}

fn enabled() -> bool {
    true
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            children_fallback: true,
            trailing_blank_line: true,
        }
    }
}

impl RenderConfig {
    /// Creates a new [`RenderConfig`].
    pub fn new(children_fallback: bool, trailing_blank_line: bool) -> Self {
        Self {
            children_fallback,
            trailing_blank_line,
        }
    }

    /// Returns `true` when a node without attributes lists its children.
    pub fn children_fallback(&self) -> bool {
        self.children_fallback
    }

    /// Returns `true` when every rendering ends with a blank line.
    pub fn trailing_blank_line(&self) -> bool {
        self.trailing_blank_line
    }
}

impl From<RenderConfig> for RenderOptions {
    fn from(config: RenderConfig) -> Self {
        Self {
            children_fallback: config.children_fallback,
            trailing_blank_line: config.trailing_blank_line,
        }
    }
}
