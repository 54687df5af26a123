//! Project configuration (`pmxc.toml`)
//!
//! ```toml
//! [check]
//! redundant_arms = "warn"
//! max_witnesses = 3
//! extensions = ["pmxc", "pmxclang"]
//! ```
//!
//! Every key is optional. A project without a configuration file uses the
//! defaults.

use crate::checker::{CheckOptions, RedundantArms};
use serde::{Deserialize, Serialize};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file
pub const CONFIG_FILE: &str = "pmxc.toml";

/// pmxc project configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub check: CheckConfig,
}

/// The `[check]` table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckConfig {
    /// Report arms covered by earlier arms
    #[serde(default)]
    pub redundant_arms: RedundantArms,

    /// Missing patterns listed in a non-exhaustive match error
    #[serde(default = "default_max_witnesses")]
    pub max_witnesses: usize,

    /// File extensions checked when a directory is given
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_max_witnesses() -> usize {
    CheckOptions::default().max_witnesses
}

fn default_extensions() -> Vec<String> {
    vec!["pmxc".to_string(), "pmxclang".to_string()]
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            redundant_arms: RedundantArms::default(),
            max_witnesses: default_max_witnesses(),
            extensions: default_extensions(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid configuration in {}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },
}

impl Config {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_at(&content, path)
    }

    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Self::parse_at(content, Path::new(CONFIG_FILE))
    }

    fn parse_at(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |message: &str| ConfigError::Invalid {
            path: path.to_path_buf(),
            message: message.to_string(),
        };
        if self.check.extensions.is_empty() {
            return Err(invalid("`check.extensions` must not be empty"));
        }
        if self
            .check
            .extensions
            .iter()
            .any(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return Err(invalid(
                "`check.extensions` entries are written without a leading dot",
            ));
        }
        Ok(())
    }

    /// Find and load the configuration that applies to `start`, searching it
    /// and its ancestors. Returns the defaults when no file exists.
    pub fn discover(start: &Path) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match find_config_file(start) {
            Some(path) => {
                let config = Self::load(&path)?;
                tracing::debug!(path = %path.display(), "loaded configuration");
                Ok((config, Some(path)))
            }
            None => {
                tracing::debug!(start = %start.display(), "no configuration file, using defaults");
                Ok((Self::default(), None))
            }
        }
    }

    /// The analyzer's view of this configuration
    pub fn check_options(&self) -> CheckOptions {
        CheckOptions {
            redundant_arms: self.check.redundant_arms,
            max_witnesses: self.check.max_witnesses,
        }
    }

    /// Whether `path` has one of the configured source extensions
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.check.extensions.iter().any(|e| e == ext))
    }

    /// Hash of every setting that changes analysis results
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.check.redundant_arms.hash(&mut hasher);
        self.check.max_witnesses.hash(&mut hasher);
        hasher.finish()
    }
}

/// Search `start` and its ancestors for a configuration file
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());
    let mut dir = if start.is_file() {
        start.parent()?.to_path_buf()
    } else {
        start.to_path_buf()
    };
    loop {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests;
