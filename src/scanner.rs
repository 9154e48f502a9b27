//! # Scanner Module
//!
//! Line-level searches used by the rewrite engine: where an existing header
//! comment starts, where it closes, and where a tagged file's open tag sits.
//!
//! Every search returns `Option<usize>`; `None` means no matching line exists
//! anywhere in the file.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Matches a line that opens a comment (`/*` or `//`) at its very start.
pub(crate) static HEADER_START_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^(/\*|//)").expect("header start regex must compile"));

/// Marker that closes a block comment.
pub const HEADER_END_MARKER: &str = "*/";

/// Default open tag of the tagged dialect.
pub const DEFAULT_OPEN_TAG: &str = "<?php";

/// How the end of a header block is searched for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HeaderSearch {
  /// Start and end are two independent scans from line 0.
  ///
  /// A file with several comment blocks can end up with an end line that
  /// belongs to a different block than the start line.
  #[default]
  Independent,
  /// The closer is only searched for at or after the opener line.
  Paired,
}

/// Dialect of a candidate file, decided from its name by the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
  /// Plain native source or header file.
  Native,
  /// Embedded-script file whose open tag must stay in front of the header.
  Tagged,
}

impl Dialect {
  /// Classifies a path by checking whether its file name ends with
  /// `.<ext>` for any of the tagged extensions.
  pub fn classify(path: &Path, tagged_extensions: &[String]) -> Self {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
      return Self::Native;
    };

    if tagged_extensions.iter().any(|ext| has_extension(&name, ext)) {
      Self::Tagged
    } else {
      Self::Native
    }
  }

  pub const fn is_tagged(self) -> bool {
    matches!(self, Self::Tagged)
  }
}

impl std::fmt::Display for Dialect {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Dialect::Native => write!(f, "native"),
      Dialect::Tagged => write!(f, "tagged"),
    }
  }
}

/// Returns true when `file_name` ends with `.` followed by `ext`.
///
/// Multi-part extensions such as `blade.php` work the same way.
pub fn has_extension(file_name: &str, ext: &str) -> bool {
  let ext = ext.trim_start_matches('.');
  if ext.is_empty() {
    return false;
  }
  file_name
    .strip_suffix(ext)
    .is_some_and(|stem| stem.ends_with('.'))
}

/// Line range of a header comment.
///
/// Both ends are optional and found by separate searches, so `end` may be
/// present without `start`, and under [`HeaderSearch::Independent`] `end` may
/// even precede `start`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderBlock {
  pub start: Option<usize>,
  pub end: Option<usize>,
}

impl HeaderBlock {
  /// Locates the header block in `lines` using the given search strategy.
  pub fn locate<S: AsRef<str>>(lines: &[S], search: HeaderSearch) -> Self {
    let start = locate_header_start(lines);
    let end = match (search, start) {
      (HeaderSearch::Paired, Some(start)) => locate_header_end_from(lines, start),
      _ => locate_header_end(lines),
    };
    Self { start, end }
  }
}

/// Index of the first line beginning with a comment opener.
pub fn locate_header_start<S: AsRef<str>>(lines: &[S]) -> Option<usize> {
  lines
    .iter()
    .position(|line| HEADER_START_REGEX.is_match(line.as_ref()))
}

/// Index of the first line containing a comment closer, scanned from line 0.
pub fn locate_header_end<S: AsRef<str>>(lines: &[S]) -> Option<usize> {
  locate_header_end_from(lines, 0)
}

fn locate_header_end_from<S: AsRef<str>>(lines: &[S], from: usize) -> Option<usize> {
  lines
    .iter()
    .skip(from)
    .position(|line| line.as_ref().contains(HEADER_END_MARKER))
    .map(|offset| offset + from)
}

/// Index of the first line containing the open tag `marker`.
pub fn locate_open_tag<S: AsRef<str>>(lines: &[S], marker: &str) -> Option<usize> {
  lines.iter().position(|line| line.as_ref().contains(marker))
}
