//! # Configuration Module
//!
//! This module provides configuration support for relicense, so a tree can pin
//! its canonical header file, attribution phrase and dialect settings instead
//! of repeating them on every invocation.
//!
//! Configuration can be specified in a `.relicense.toml` file at the target
//! root or via the `RELICENSE_CONFIG` environment variable.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::scanner::HeaderSearch;
use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".relicense.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "RELICENSE_CONFIG";

/// Main configuration struct for relicense.
///
/// Every key is optional; unset keys fall back to the CLI value or the
/// built-in default.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
  /// Canonical header text file. Relative paths are resolved against the
  /// directory holding the config file.
  pub header_file: Option<PathBuf>,

  /// Phrase that marks an existing license header.
  pub attribution: Option<String>,

  /// Open tag of the tagged dialect.
  pub open_tag: Option<String>,

  /// Extensions (without the leading dot) classified as the tagged dialect.
  pub tagged_extensions: Option<Vec<String>>,

  /// How the end of an existing header is searched for.
  pub header_search: Option<HeaderSearch>,

  /// Glob patterns of paths to skip, added to any `--ignore` flags.
  #[serde(default)]
  pub ignore: Vec<String>,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// A key holds a value that cannot be used.
  #[error("Invalid value for '{key}': {message}")]
  InvalidValue { key: String, message: String },
}

impl Config {
  /// Load configuration from a file.
  ///
  /// # Arguments
  ///
  /// * `path` - Path to the configuration file
  ///
  /// # Returns
  ///
  /// The loaded configuration with `header-file` resolved, or an error if the
  /// file cannot be read, parsed or validated.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let mut config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    config.validate()?;

    if let Some(header_file) = config.header_file.take() {
      let base = path.parent().unwrap_or_else(|| Path::new(""));
      config.header_file = Some(base.join(header_file));
    }

    Ok(config)
  }

  /// Validate the configuration.
  ///
  /// Checks that:
  /// - `attribution` and `open-tag` are non-empty when set
  /// - `tagged-extensions` entries are non-empty and have no leading dot
  fn validate(&self) -> Result<(), ConfigError> {
    for (key, value) in [("attribution", &self.attribution), ("open-tag", &self.open_tag)] {
      if value.as_ref().is_some_and(|v| v.trim().is_empty()) {
        return Err(ConfigError::InvalidValue {
          key: key.to_string(),
          message: "value cannot be empty".to_string(),
        });
      }
    }

    for ext in self.tagged_extensions.iter().flatten() {
      if ext.is_empty() {
        return Err(ConfigError::InvalidValue {
          key: "tagged-extensions".to_string(),
          message: "extension cannot be empty".to_string(),
        });
      }
      if ext.starts_with('.') {
        return Err(ConfigError::InvalidValue {
          key: "tagged-extensions".to_string(),
          message: format!("extension '{}' should not include leading dot", ext),
        });
      }
    }

    Ok(())
  }
}

/// Discover the configuration file path.
///
/// The configuration file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`)
/// 2. Path specified via `RELICENSE_CONFIG` environment variable
/// 3. `.relicense.toml` in the target root
///
/// # Arguments
///
/// * `explicit_path` - Optional explicit path from CLI flag
/// * `root` - The directory being processed
pub fn discover_config_path(explicit_path: Option<&Path>, root: &Path) -> Option<PathBuf> {
  if let Some(path) = explicit_path {
    if path.exists() {
      verbose_log!("Using explicit config path: {}", path.display());
      return Some(path.to_path_buf());
    }
    verbose_log!("Explicit config path does not exist: {}", path.display());
    return None;
  }

  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(&env_path);
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  // A single-file root looks next to the file
  let root_dir = if root.is_file() { root.parent().unwrap_or(root) } else { root };
  let root_config = root_dir.join(DEFAULT_CONFIG_FILENAME);
  if root_config.exists() {
    verbose_log!("Using root config: {}", root_config.display());
    return Some(root_config);
  }

  verbose_log!("No config file found");
  None
}

/// Load configuration from the discovered path.
///
/// # Arguments
///
/// * `explicit_path` - Optional explicit path from CLI flag
/// * `root` - The directory being processed
/// * `no_config` - If true, skip config file discovery
///
/// # Returns
///
/// The loaded configuration, or `None` if discovery is disabled or no file
/// was found.
pub fn load_config(explicit_path: Option<&Path>, root: &Path, no_config: bool) -> Result<Option<Config>> {
  if no_config {
    verbose_log!("Config file discovery disabled (--no-config)");
    return Ok(None);
  }

  if let Some(path) = explicit_path
    && !path.exists()
  {
    anyhow::bail!("Config file not found: {}", path.display());
  }

  match discover_config_path(explicit_path, root) {
    Some(path) => {
      let config = Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display()))?;
      Ok(Some(config))
    }
    None => Ok(None),
  }
}
