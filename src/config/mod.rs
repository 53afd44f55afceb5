//! Default settings.
//!
//! A script run may start from a default-settings file named by the
//! `REST_SCRIPT_DEFAULTS` environment variable. Problems with the file are
//! reported and otherwise ignored by the interpreter.

pub mod schema;

pub use schema::{parse_loose_bool, ScriptDefaults, HEADER_KEY_PREFIX};

use crate::resolver::Resolver;
use log::{debug, info, warn};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the default-settings file.
pub const DEFAULTS_ENV_VAR: &str = "REST_SCRIPT_DEFAULTS";

/// Errors that can occur while loading the default-settings file.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The file is not a valid settings document.
    Parse {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },

    /// The settings parsed but are not usable.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "Loading file [{}]: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Parsing content of [{}]: {}", path.display(), source)
            }
            ConfigError::Invalid(msg) => write!(f, "Invalid default settings: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Invalid(_) => None,
        }
    }
}

/// Returns the raw default-settings location, if the variable is set and non-empty.
///
/// The value may still contain `${...}` placeholders.
pub fn defaults_location() -> Option<String> {
    std::env::var(DEFAULTS_ENV_VAR)
        .ok()
        .filter(|location| !location.trim().is_empty())
}

/// Loads the default-settings file named by `REST_SCRIPT_DEFAULTS`, if any.
///
/// Placeholders in the location are expanded with the dynamic keys only.
/// Problems with the file are logged and yield `None`.
pub fn load_env_defaults() -> Option<ScriptDefaults> {
    let location = defaults_location()?;
    let location = match Resolver::new().expand(&location) {
        Ok(location) => location,
        Err(e) => {
            warn!("cannot expand default settings location [{}]: {}", location, e);
            return None;
        }
    };

    match load_defaults(Path::new(&location)) {
        Ok(defaults) => {
            for key in defaults.unknown_keys() {
                debug!("ignoring default setting [{}]", key);
            }
            Some(defaults)
        }
        Err(e) => {
            warn!("{}", e);
            None
        }
    }
}

/// Loads and validates a default-settings file.
///
/// # Arguments
///
/// * `path` - Location of the JSON settings file
///
/// # Returns
///
/// `Ok(ScriptDefaults)` with the parsed settings, or `Err(ConfigError)`.
pub fn load_defaults(path: &Path) -> Result<ScriptDefaults, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let value = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let defaults = ScriptDefaults::from_json(value).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    defaults.validate().map_err(ConfigError::Invalid)?;

    info!("loaded default settings from {}", path.display());
    Ok(defaults)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_defaults_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"base.url": "http://localhost:9000", "header:Accept": "application/json"}}"#
        )
        .unwrap();

        let defaults = load_defaults(file.path()).unwrap();
        assert_eq!(defaults.base_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(defaults.headers().len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let err = load_defaults(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn test_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            load_defaults(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_invalid_settings() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"timeout": 0}}"#).unwrap();
        assert!(matches!(
            load_defaults(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }
}
