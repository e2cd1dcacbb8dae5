//! Optional TOML configuration.
//!
//! ```toml
//! role = "mod"
//! default_top_n = 10
//!
//! [columns]
//! customer = ["client"]
//! serial = ["s/n"]
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rma_map::ColumnResolver;
use rma_model::{Role, SemanticField};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "rma.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown field '{field}' in [columns] of {path}")]
    UnknownField { path: PathBuf, field: String },

    #[error("default_top_n in {path} must be at least 1")]
    InvalidTopN { path: PathBuf },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    role: Option<Role>,
    default_top_n: Option<usize>,
    #[serde(default)]
    columns: BTreeMap<String, Vec<String>>,
}

/// Settings read from the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Role used when `--role` is not given.
    pub role: Option<Role>,
    /// Top-N used when `--top-n` is not given, in place of the report default.
    pub default_top_n: Option<usize>,
    /// Extra header substrings per field, tried after the built-in ones.
    pub columns: BTreeMap<SemanticField, Vec<String>>,
}

impl Config {
    /// Parses configuration text; `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if raw.default_top_n == Some(0) {
            return Err(ConfigError::InvalidTopN {
                path: path.to_path_buf(),
            });
        }
        let mut columns = BTreeMap::new();
        for (key, candidates) in raw.columns {
            let field: SemanticField = key.parse().map_err(|_| ConfigError::UnknownField {
                path: path.to_path_buf(),
                field: key.clone(),
            })?;
            columns.insert(field, candidates);
        }
        Ok(Self {
            role: raw.role,
            default_top_n: raw.default_top_n,
            columns,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text, path)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Loads `explicit` when given, else `rma.toml` in `dir` when present.
    ///
    /// An explicit file must load. A discovered file that fails to load is
    /// reported and replaced by the defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let path = dir.join(DEFAULT_CONFIG_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }
        match Self::load(&path) {
            Ok(config) => Ok(config),
            Err(error) => {
                warn!(%error, "ignoring config file");
                Ok(Self::default())
            }
        }
    }

    /// Column resolver carrying the configured extra candidates.
    pub fn resolver(&self) -> ColumnResolver {
        self.columns
            .iter()
            .fold(ColumnResolver::new(), |resolver, (field, candidates)| {
                resolver.with_extra_candidates(*field, candidates.iter().cloned())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_default() {
        let config = Config::parse("", Path::new("rma.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn zero_top_n_is_rejected() {
        let err = Config::parse("default_top_n = 0", Path::new("rma.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTopN { .. }));
    }

    #[test]
    fn unknown_key_is_a_parse_error() {
        let err = Config::parse("colour = \"red\"", Path::new("rma.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
