//! Locating and reading the TOML configuration file.
//!
//! An explicit `--config` path must exist. Otherwise the first existing file
//! among the local and the per-user candidates is used, and the defaults
//! apply when there is none.

use std::{
    fs, io,
    ops::Range,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use astshape::config::AppConfig;

const CONFIG_FILE: &str = "config.toml";
const LOCAL_DIR: &str = "astshape";

/// A configuration file that could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file `{}` does not exist", path.display())]
    Missing { path: PathBuf },

    #[error("cannot read configuration file `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration in `{}`: {message}", path.display())]
    Parse {
        path: PathBuf,
        /// The file contents, for pointing at `span`.
        src: String,
        message: String,
        span: Option<Range<usize>>,
    },
}

/// Loads the configuration from `explicit_path`, a discovered file, or the
/// defaults, in that order of preference.
///
/// # Errors
///
/// - [`ConfigError::Missing`] when `explicit_path` names no file.
/// - [`ConfigError::Read`] or [`ConfigError::Parse`] when the chosen file
///   cannot be read or is not a valid configuration.
pub fn load_config(explicit_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match locate(explicit_path)? {
        Some(path) => parse_file(&path),
        None => {
            debug!("No configuration file found, using defaults");
            Ok(AppConfig::default())
        }
    }
}

fn locate(explicit_path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = explicit_path {
        if !path.is_file() {
            return Err(ConfigError::Missing {
                path: path.to_path_buf(),
            });
        }
        info!(path:? = path; "Using configuration given on the command line");
        return Ok(Some(path.to_path_buf()));
    }

    let found = candidates().find(|path| {
        let exists = path.is_file();
        debug!(path:? = path, exists; "Checked configuration candidate");
        exists
    });
    if let Some(path) = &found {
        info!(path:? = path; "Using discovered configuration");
    }
    Ok(found)
}

/// The local file first, then the per-user file when the platform has a
/// configuration directory.
fn candidates() -> impl Iterator<Item = PathBuf> {
    let local = Path::new(LOCAL_DIR).join(CONFIG_FILE);
    let user = ProjectDirs::from("com", "astshape", "astshape")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE));

    std::iter::once(local).chain(user)
}

fn parse_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let src = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&src).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.message().to_string(),
        span: err.span(),
        src,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[source]\nstrict_order = true\n").unwrap();

        let config = load_config(Some(path.as_path())).unwrap();

        assert!(config.source().strict_order());
        assert!(config.render().children_fallback());
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("absent.toml");

        let err = load_config(Some(absent.as_path())).unwrap_err();

        assert!(matches!(err, ConfigError::Missing { ref path } if *path == absent));
    }

    #[test]
    fn test_invalid_config_points_at_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let content = "[render]\nchildren_fallback = \"sometimes\"\n";
        fs::write(&path, content).unwrap();

        let err = load_config(Some(path.as_path())).unwrap_err();

        let ConfigError::Parse { src, span, message, .. } = err else {
            panic!("expected a parse error");
        };
        assert_eq!(src, content);
        assert!(!message.is_empty());
        let span = span.expect("parse errors carry a span");
        assert!(span.end <= content.len());
    }

    #[test]
    fn test_candidates_start_with_local_file() {
        let first = candidates().next().unwrap();
        assert_eq!(first, Path::new("astshape").join("config.toml"));
    }
}
