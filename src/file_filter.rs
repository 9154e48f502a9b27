//! # File Filter Module
//!
//! This module contains components for filtering candidate files based on
//! their extension and on user-supplied ignore patterns.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};

use crate::scanner::has_extension;
use crate::verbose_log;

/// Result of a file filtering operation.
#[derive(Debug)]
pub struct FilterResult {
  /// Whether the file should be processed
  pub should_process: bool,
  /// Reason why the file should not be processed (if any)
  pub reason: Option<String>,
}

impl FilterResult {
  /// Creates a new FilterResult indicating the file should be processed.
  pub const fn process() -> Self {
    Self {
      should_process: true,
      reason: None,
    }
  }

  /// Creates a new FilterResult indicating the file should be skipped.
  pub fn skip(reason: impl Into<String>) -> Self {
    Self {
      should_process: false,
      reason: Some(reason.into()),
    }
  }
}

/// Trait for components that filter files based on certain criteria.
pub trait FileFilter: Send + Sync {
  /// Determines whether a file should be processed.
  ///
  /// # Parameters
  ///
  /// * `path` - The path to the file to check
  ///
  /// # Returns
  ///
  /// A `FilterResult` indicating whether the file should be processed and why
  /// not if applicable.
  fn should_process(&self, path: &Path) -> Result<FilterResult>;
}

/// Filter that keeps files whose name ends with `.<ext>` for one of the
/// configured extensions.
///
/// Matching is case-sensitive and works for multi-part extensions
/// (`blade.php`). Leading dots in the configured extensions are tolerated.
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
  extensions: Vec<String>,
}

impl ExtensionFilter {
  pub fn new<I, S>(extensions: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let extensions = extensions
      .into_iter()
      .map(|ext| ext.as_ref().trim_start_matches('.').to_string())
      .filter(|ext| !ext.is_empty())
      .collect();
    Self { extensions }
  }

  pub fn extensions(&self) -> &[String] {
    &self.extensions
  }

  pub fn is_empty(&self) -> bool {
    self.extensions.is_empty()
  }
}

impl FileFilter for ExtensionFilter {
  fn should_process(&self, path: &Path) -> Result<FilterResult> {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
      return Ok(FilterResult::skip("No file name"));
    };

    if self.extensions.iter().any(|ext| has_extension(&name, ext)) {
      Ok(FilterResult::process())
    } else {
      Ok(FilterResult::skip("Extension not selected"))
    }
  }
}

/// Filter that excludes files matching glob ignore patterns.
///
/// Patterns are matched against the path relative to the root. A pattern
/// without a leading `**/` also matches at any depth, and a plain name
/// (`vendor`) matches a directory of that name anywhere in the tree.
pub struct IgnoreFilter {
  root: PathBuf,
  patterns: Vec<Pattern>,
}

impl IgnoreFilter {
  /// Creates a new IgnoreFilter from a list of ignore patterns.
  pub fn from_patterns(root: &Path, patterns: &[String]) -> Result<Self> {
    let mut compiled = Vec::with_capacity(patterns.len() * 2);

    for pattern in patterns {
      let pattern = pattern.replace('\\', "/");
      let pattern = pattern.trim_end_matches('/');

      let mut add = |p: &str| -> Result<()> {
        compiled.push(Pattern::new(p).with_context(|| format!("Invalid glob pattern: {}", p))?);
        Ok(())
      };

      if !pattern.contains(['*', '?', '[']) {
        add(pattern)?;
        add(&format!("**/{}", pattern))?;
        add(&format!("{}/**", pattern))?;
        add(&format!("**/{}/**", pattern))?;
      } else {
        add(pattern)?;
        if !pattern.starts_with("**/") {
          add(&format!("**/{}", pattern))?;
        }
      }
    }

    Ok(Self {
      root: root.to_path_buf(),
      patterns: compiled,
    })
  }

  fn is_ignored(&self, path: &Path) -> bool {
    let relative = path.strip_prefix(&self.root).unwrap_or(path);
    let options = MatchOptions {
      case_sensitive: true,
      require_literal_separator: true,
      require_literal_leading_dot: false,
    };
    self
      .patterns
      .iter()
      .any(|pattern| pattern.matches_path_with(relative, options))
  }
}

impl FileFilter for IgnoreFilter {
  fn should_process(&self, path: &Path) -> Result<FilterResult> {
    if self.is_ignored(path) {
      verbose_log!("Skipping: {} (matches ignore pattern)", path.display());
      Ok(FilterResult::skip("Matches ignore pattern"))
    } else {
      Ok(FilterResult::process())
    }
  }
}
