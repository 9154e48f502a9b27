//! # Diff Module
//!
//! This module contains functionality for creating and rendering diffs between original and rewritten content.
//! It's used to show what a header replacement or insertion changes in a file.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use similar::{ChangeTag, TextDiff};

/// Manages diff creation and rendering for header changes.
///
/// This struct handles:
/// - Generating diffs between original and rewritten content
/// - Displaying diffs to stderr with colorization
/// - Saving diffs to a file
pub struct DiffManager {
  /// Whether to show diffs on stderr
  pub show_diff: bool,

  /// Path to save the diff to
  pub save_diff_path: Option<PathBuf>,
}

impl DiffManager {
  /// Creates a new DiffManager with the specified configuration.
  ///
  /// # Parameters
  ///
  /// * `show_diff` - Whether to show diffs on stderr
  /// * `save_diff_path` - Path to save the diff to
  pub const fn new(show_diff: bool, save_diff_path: Option<PathBuf>) -> Self {
    Self {
      show_diff,
      save_diff_path,
    }
  }

  /// Whether any diff output was requested.
  pub const fn is_enabled(&self) -> bool {
    self.show_diff || self.save_diff_path.is_some()
  }

  /// Truncates the diff file so a run starts from an empty file.
  pub fn init(&self) -> Result<()> {
    if let Some(ref diff_path) = self.save_diff_path {
      File::create(diff_path).with_context(|| format!("Failed to create diff file: {}", diff_path.display()))?;
    }
    Ok(())
  }

  /// Renders the line diff between `original` and `new` for `path`.
  pub fn render(path: &Path, original: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(original, new);

    let mut diff_content = format!("Diff for {}:\n", path.display());
    for change in diff.iter_all_changes() {
      let sign = match change.tag() {
        ChangeTag::Delete => "-",
        ChangeTag::Insert => "+",
        ChangeTag::Equal => " ",
      };
      diff_content.push_str(sign);
      diff_content.push_str(change.value());
      if change.missing_newline() {
        diff_content.push('\n');
      }
    }
    diff_content.push('\n');

    diff_content
  }

  /// Renders the diff between the original and new content and, if
  /// show_diff is enabled, displays it on stderr with colorization.
  ///
  /// The rendered text is returned so the caller can hand it to
  /// [`save_diffs`](Self::save_diffs) once the whole batch is done.
  ///
  /// # Parameters
  ///
  /// * `path` - Path to the file being processed
  /// * `original` - Original file content
  /// * `new` - Rewritten file content
  pub fn display_diff(&self, path: &Path, original: &str, new: &str) -> String {
    let diff_content = Self::render(path, original, new);

    if self.show_diff {
      // Print the whole diff in one call so parallel workers do not interleave lines
      let colored: String = diff_content
        .lines()
        .map(|line| {
          let line = if line.starts_with('+') {
            line.if_supports_color(Stream::Stderr, |l| l.green()).to_string()
          } else if line.starts_with('-') {
            line.if_supports_color(Stream::Stderr, |l| l.red()).to_string()
          } else {
            line.to_string()
          };
          line + "\n"
        })
        .collect();
      eprint!("{}", colored);
    }

    diff_content
  }

  /// Appends rendered diffs to the diff file in the order given, creating a
  /// single consolidated diff file across all processed files.
  ///
  /// Does nothing when no save path is configured.
  pub fn save_diffs<'a>(&self, diffs: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let Some(ref diff_path) = self.save_diff_path else {
      return Ok(());
    };

    let mut file = OpenOptions::new()
      .create(true)
      .append(true)
      .open(diff_path)
      .with_context(|| format!("Error opening diff file: {}", diff_path.display()))?;
    for diff in diffs {
      file
        .write_all(diff.as_bytes())
        .with_context(|| format!("Error writing to diff file: {}", diff_path.display()))?;
    }

    Ok(())
  }
}
