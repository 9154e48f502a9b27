//! # License Detection Module
//!
//! This module contains the interfaces and implementations for license detection algorithms.
//! It allows for easily replacing the license detection algorithm without modifying the processor.

use regex::{Regex, RegexBuilder};

use crate::scanner::{HEADER_END_MARKER, HEADER_START_REGEX};

/// Attribution phrase that identifies the canonical license header.
pub const DEFAULT_ATTRIBUTION: &str = "Licensed to Elasticsearch B.V.";

/// Trait for license detectors.
///
/// Implementations of this trait are responsible for determining whether a file
/// already contains a license header based on its lines.
pub trait LicenseDetector: Send + Sync {
  /// Checks if the lines already carry a license header.
  ///
  /// # Parameters
  ///
  /// * `lines` - The file content split into lines
  ///
  /// # Returns
  ///
  /// `true` if the content appears to have a license header, `false` otherwise.
  fn has_license(&self, lines: &[&str]) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
  Outside,
  InsideComment,
}

/// Detects a license by looking for an attribution phrase inside a comment
/// block.
///
/// The scan enters a comment on any line opening with `/*` or `//` (after
/// trimming) and leaves it on a line containing `*/`. The phrase only counts
/// while inside a comment. A block deep into the file still counts, and a
/// header whose wording differs from the phrase does not.
pub struct AttributionDetector {
  phrase: Regex,
}

impl AttributionDetector {
  /// Creates a detector matching `phrase` literally and case-insensitively.
  pub fn new(phrase: &str) -> Result<Self, regex::Error> {
    let phrase = RegexBuilder::new(&regex::escape(phrase))
      .case_insensitive(true)
      .build()?;
    Ok(Self { phrase })
  }
}

impl Default for AttributionDetector {
  fn default() -> Self {
    Self::new(DEFAULT_ATTRIBUTION).expect("escaped attribution phrase must compile")
  }
}

impl LicenseDetector for AttributionDetector {
  fn has_license(&self, lines: &[&str]) -> bool {
    let mut state = ScanState::Outside;

    for line in lines {
      let line = line.trim();
      if line.is_empty() {
        continue;
      }

      if HEADER_START_REGEX.is_match(line) {
        state = ScanState::InsideComment;
      }

      if state == ScanState::InsideComment {
        if self.phrase.is_match(line) {
          return true;
        }
        if line.contains(HEADER_END_MARKER) {
          state = ScanState::Outside;
        }
      }
    }

    false
  }
}
