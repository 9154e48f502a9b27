//! # Content Transformer Module
//!
//! The rewrite engine: turns a file's text into its canonical-header form.
//!
//! Three transformations exist:
//! - Replace an existing header (the attribution phrase was found in a comment)
//! - Insert a header after the open tag of a tagged-dialect file
//! - Insert a header at the very top of any other file
//!
//! The engine never performs I/O and never fails. Missing line indices turn
//! into empty slices, so malformed input still yields a result, possibly with
//! the header in an unexpected position.

use std::sync::Arc;

use crate::header::CanonicalHeader;
use crate::license_detection::LicenseDetector;
use crate::scanner::{Dialect, HeaderBlock, HeaderSearch, locate_open_tag};

/// Which branch of the engine produced a rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteAction {
  /// An existing header block was swapped for the canonical one.
  Replaced,
  /// The header went in after the open-tag line.
  InsertedAfterTag,
  /// The header went in at the top of the file.
  InsertedAtTop,
}

impl RewriteAction {
  pub const fn is_insert(self) -> bool {
    !matches!(self, Self::Replaced)
  }
}

/// Result of a transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
  /// The complete new file text.
  pub content: String,
  /// The branch that produced it.
  pub action: RewriteAction,
}

/// Content transformation for canonical license headers.
///
/// The `ContentTransformer` holds the immutable inputs of the engine: the
/// canonical header, the presence detector, the open-tag marker and the
/// header search strategy. Each call to [`transform`](Self::transform) is a
/// pure function of its arguments.
pub struct ContentTransformer {
  header: CanonicalHeader,
  detector: Arc<dyn LicenseDetector>,
  open_tag: String,
  search: HeaderSearch,
}

impl ContentTransformer {
  /// Creates a new ContentTransformer.
  ///
  /// # Parameters
  ///
  /// * `header` - Text written into every file
  /// * `detector` - Decides between the replace and insert branches
  /// * `open_tag` - Marker of the tagged dialect's open tag line
  /// * `search` - How the end of an existing header is located
  pub fn new(
    header: CanonicalHeader,
    detector: Arc<dyn LicenseDetector>,
    open_tag: impl Into<String>,
    search: HeaderSearch,
  ) -> Self {
    Self {
      header,
      detector,
      open_tag: open_tag.into(),
      search,
    }
  }

  /// Checks whether the content already carries a license header.
  pub fn has_license(&self, content: &str) -> bool {
    let lines: Vec<&str> = content.lines().collect();
    self.detector.has_license(&lines)
  }

  /// Rewrites `content` so that it carries the canonical header.
  ///
  /// # Parameters
  ///
  /// * `content` - The full file text
  /// * `dialect` - Dialect classification of the file, derived from its name
  ///
  /// # Returns
  ///
  /// The new file text together with the branch that produced it.
  pub fn transform(&self, content: &str, dialect: Dialect) -> Rewrite {
    let lines: Vec<&str> = content.lines().collect();

    if self.detector.has_license(&lines) {
      let block = HeaderBlock::locate(&lines, self.search);
      return Rewrite {
        content: self.replace_header(content, &lines, block),
        action: RewriteAction::Replaced,
      };
    }

    if dialect.is_tagged() {
      let tag = locate_open_tag(&lines, &self.open_tag);
      Rewrite {
        content: self.insert_after_tag(content, &lines, tag),
        action: RewriteAction::InsertedAfterTag,
      }
    } else {
      Rewrite {
        content: self.insert_at_top(content),
        action: RewriteAction::InsertedAtTop,
      }
    }
  }

  /// Keeps the lines before the block, writes the header, then keeps the
  /// lines after the block. A missing start drops everything before the
  /// header; a missing end drops everything after it.
  fn replace_header(&self, content: &str, lines: &[&str], block: HeaderBlock) -> String {
    let before = block.start.map_or(&[][..], |start| &lines[..start]);
    let after = block.end.map_or(&[][..], |end| &lines[end + 1..]);

    let mut out = LineWriter::with_capacity(content.len() + self.header.text().len());
    out.push_lines(before);
    out.push_header(&self.header);
    out.push_lines(after);
    out.finish(content, !after.is_empty())
  }

  /// Keeps everything up to and including the open tag, then a blank line,
  /// the header and the remaining lines. Without a tag the prefix is empty
  /// and the blank line leads the file.
  fn insert_after_tag(&self, content: &str, lines: &[&str], tag: Option<usize>) -> String {
    let split = tag.map_or(0, |tag| tag + 1);
    let (before, after) = lines.split_at(split);

    let mut out = LineWriter::with_capacity(content.len() + self.header.text().len() + 1);
    out.push_lines(before);
    out.push_line("");
    out.push_header(&self.header);
    out.push_lines(after);
    out.finish(content, !after.is_empty())
  }

  /// Writes the header, a blank line, then the original text untouched.
  fn insert_at_top(&self, content: &str) -> String {
    let mut out = LineWriter::with_capacity(content.len() + self.header.text().len() + 2);
    out.push_header(&self.header);
    out.push_line("");
    out.push_verbatim(content);
    out.out
  }
}

/// Reassembles lines with `\n` separators.
struct LineWriter {
  out: String,
}

impl LineWriter {
  fn with_capacity(capacity: usize) -> Self {
    Self {
      out: String::with_capacity(capacity),
    }
  }

  fn push_line(&mut self, line: &str) {
    self.out.push_str(line);
    self.out.push('\n');
  }

  fn push_lines(&mut self, lines: &[&str]) {
    for line in lines {
      self.push_line(line);
    }
  }

  fn push_verbatim(&mut self, text: &str) {
    self.out.push_str(text);
  }

  fn push_header(&mut self, header: &CanonicalHeader) {
    self.out.push_str(header.text());
    if !header.text().ends_with('\n') {
      self.out.push('\n');
    }
  }

  /// Drops the final newline when the output ends with original lines and
  /// the original text had no trailing newline.
  fn finish(mut self, original: &str, ends_with_original: bool) -> String {
    if ends_with_original && !original.ends_with('\n') {
      self.out.pop();
    }
    self.out
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::license_detection::AttributionDetector;

  const HEADER: &str = "/*\n * Licensed to Elasticsearch B.V. under one\n */\n";

  fn transformer(search: HeaderSearch) -> ContentTransformer {
    ContentTransformer::new(
      CanonicalHeader::new(HEADER).expect("valid header"),
      Arc::new(AttributionDetector::default()),
      "<?php",
      search,
    )
  }

  fn default_transformer() -> ContentTransformer {
    transformer(HeaderSearch::Independent)
  }

  // === Insert branch ===

  #[test]
  fn test_insert_at_top_is_header_blank_line_content() {
    let t = default_transformer();
    let content = "#include <stdio.h>\nint main() { return 0; }\n";
    let rewrite = t.transform(content, Dialect::Native);
    assert_eq!(rewrite.action, RewriteAction::InsertedAtTop);
    assert_eq!(rewrite.content, format!("{}\n{}", HEADER, content));
  }

  #[test]
  fn test_insert_at_top_empty_file() {
    let t = default_transformer();
    let rewrite = t.transform("", Dialect::Native);
    assert_eq!(rewrite.content, format!("{}\n", HEADER));
  }

  #[test]
  fn test_insert_after_tag_example() {
    let t = default_transformer();
    let rewrite = t.transform("<?php\necho 1;", Dialect::Tagged);
    assert_eq!(rewrite.action, RewriteAction::InsertedAfterTag);

    let lines: Vec<&str> = rewrite.content.lines().collect();
    let mut expected = vec!["<?php", ""];
    expected.extend(HEADER.lines());
    expected.push("echo 1;");
    assert_eq!(lines, expected);
    assert!(!rewrite.content.ends_with('\n'));
  }

  #[test]
  fn test_insert_after_tag_keeps_trailing_newline() {
    let t = default_transformer();
    let rewrite = t.transform("<?php\n\nnamespace A;\n", Dialect::Tagged);
    assert_eq!(rewrite.content, format!("<?php\n\n{}\nnamespace A;\n", HEADER));
  }

  #[test]
  fn test_insert_after_tag_keeps_lines_before_tag() {
    let t = default_transformer();
    let rewrite = t.transform("#!/usr/bin/env php\n<?php\necho 1;\n", Dialect::Tagged);
    assert_eq!(rewrite.content, format!("#!/usr/bin/env php\n<?php\n\n{}echo 1;\n", HEADER));
  }

  #[test]
  fn test_insert_after_tag_only_tag_line() {
    let t = default_transformer();
    let rewrite = t.transform("<?php", Dialect::Tagged);
    assert_eq!(rewrite.content, format!("<?php\n\n{}", HEADER));
  }

  #[test]
  fn test_insert_tagged_without_tag_leads_with_blank_line() {
    let t = default_transformer();
    let rewrite = t.transform("echo 1;\n", Dialect::Tagged);
    assert_eq!(rewrite.content, format!("\n{}echo 1;\n", HEADER));
  }

  #[test]
  fn test_tag_in_native_file_is_ignored() {
    let t = default_transformer();
    let content = "<?php\necho 1;\n";
    let rewrite = t.transform(content, Dialect::Native);
    assert_eq!(rewrite.content, format!("{}\n{}", HEADER, content));
  }

  // === Replace branch ===

  #[test]
  fn test_replace_drops_exactly_the_old_block() {
    let t = default_transformer();
    let content = "/* Licensed to Elasticsearch B.V. old wording */\n\n#include <a.h>\n";
    let rewrite = t.transform(content, Dialect::Native);
    assert_eq!(rewrite.action, RewriteAction::Replaced);
    assert_eq!(rewrite.content, format!("{}\n#include <a.h>\n", HEADER));
  }

  #[test]
  fn test_replace_multi_line_block_in_tagged_file() {
    let t = default_transformer();
    let content = "<?php\n\n/*\n * Licensed to Elasticsearch B.V. under one\n * old text\n */\n\nnamespace A;\n";
    let rewrite = t.transform(content, Dialect::Tagged);
    assert_eq!(rewrite.content, format!("<?php\n\n{}\nnamespace A;\n", HEADER));
  }

  #[test]
  fn test_replace_without_closer_drops_tail() {
    let t = default_transformer();
    let content = "/*\n * Licensed to Elasticsearch B.V.\nint x;\n";
    let rewrite = t.transform(content, Dialect::Native);
    assert_eq!(rewrite.action, RewriteAction::Replaced);
    assert_eq!(rewrite.content, HEADER);
  }

  #[test]
  fn test_replace_without_anchored_opener_drops_prefix() {
    let t = default_transformer();
    // The indented opener enters the comment for detection but is not an
    // anchored header start.
    let content = "<?php\n  /* Licensed to Elasticsearch B.V. */\necho 1;";
    let rewrite = t.transform(content, Dialect::Tagged);
    assert_eq!(rewrite.action, RewriteAction::Replaced);
    assert_eq!(rewrite.content, format!("{}echo 1;", HEADER));
  }

  #[test]
  fn test_replace_independent_search_with_earlier_closer() {
    let t = transformer(HeaderSearch::Independent);
    let content = "int a; /* x */\n/*\n * Licensed to Elasticsearch B.V.\n */\nint b;\n";
    let rewrite = t.transform(content, Dialect::Native);
    // The closer on line 0 is taken as the header end, so the old header
    // body survives after the new header.
    assert_eq!(
      rewrite.content,
      format!("int a; /* x */\n{}/*\n * Licensed to Elasticsearch B.V.\n */\nint b;\n", HEADER)
    );
  }

  #[test]
  fn test_replace_paired_search_with_earlier_closer() {
    let t = transformer(HeaderSearch::Paired);
    let content = "int a; /* x */\n/*\n * Licensed to Elasticsearch B.V.\n */\nint b;\n";
    let rewrite = t.transform(content, Dialect::Native);
    assert_eq!(rewrite.content, format!("int a; /* x */\n{}int b;\n", HEADER));
  }

  #[test]
  fn test_replace_line_comment_header() {
    let t = default_transformer();
    // `//` headers have no closer; everything after the header is dropped
    // unless some later line contains one.
    let content = "// Licensed to Elasticsearch B.V.\nint x; /* y */\nint z;";
    let rewrite = t.transform(content, Dialect::Native);
    assert_eq!(rewrite.content, format!("{}int z;", HEADER));
  }

  #[test]
  fn test_differently_worded_header_gets_duplicated() {
    let t = default_transformer();
    let content = "/*\n * Copyright (c) Elastic. All rights reserved.\n */\nint x;\n";
    let rewrite = t.transform(content, Dialect::Native);
    assert_eq!(rewrite.action, RewriteAction::InsertedAtTop);
    assert!(rewrite.content.ends_with(content));
    assert!(rewrite.content.starts_with(HEADER));
  }

  // === Idempotence ===

  #[test]
  fn test_idempotent_native() {
    let t = default_transformer();
    for content in ["int x;\n", "int x;", "", "\n\nint x;\n\n"] {
      let first = t.transform(content, Dialect::Native).content;
      let second = t.transform(&first, Dialect::Native);
      assert_eq!(second.action, RewriteAction::Replaced);
      assert_eq!(second.content, first, "not idempotent for {:?}", content);
    }
  }

  #[test]
  fn test_idempotent_tagged() {
    let t = default_transformer();
    for content in ["<?php\necho 1;", "<?php\n\nnamespace A;\n", "<?php"] {
      let first = t.transform(content, Dialect::Tagged).content;
      let second = t.transform(&first, Dialect::Tagged);
      assert_eq!(second.action, RewriteAction::Replaced);
      assert_eq!(second.content, first, "not idempotent for {:?}", content);
    }
  }

  #[test]
  fn test_header_without_trailing_newline_stays_verbatim() {
    let header = "/* Licensed to Elasticsearch B.V. */";
    let t = ContentTransformer::new(
      CanonicalHeader::new(header).expect("valid header"),
      Arc::new(AttributionDetector::default()),
      "<?php",
      HeaderSearch::Independent,
    );
    let rewrite = t.transform("<?php\necho 1;\n", Dialect::Tagged);
    assert_eq!(rewrite.content, format!("<?php\n\n{}\necho 1;\n", header));
  }

  #[test]
  fn test_native_insert_separates_header_without_trailing_newline() {
    let header = "/* Licensed to Elasticsearch B.V. */";
    let t = ContentTransformer::new(
      CanonicalHeader::new(header).expect("valid header"),
      Arc::new(AttributionDetector::default()),
      "<?php",
      HeaderSearch::Independent,
    );
    let rewrite = t.transform("int x;\n", Dialect::Native);
    assert_eq!(rewrite.action, RewriteAction::InsertedAtTop);
    assert_eq!(rewrite.content, format!("{}\n\nint x;\n", header));

    let lines: Vec<&str> = rewrite.content.lines().collect();
    assert_eq!(lines, vec![header, "", "int x;"]);

    let second = t.transform(&rewrite.content, Dialect::Native);
    assert_eq!(second.action, RewriteAction::Replaced);
    assert_eq!(second.content, rewrite.content);
  }

  #[test]
  fn test_crlf_input_is_normalized_to_lf() {
    let t = default_transformer();
    let rewrite = t.transform("<?php\r\necho 1;\r\n", Dialect::Tagged);
    assert_eq!(rewrite.content, format!("<?php\n\n{}echo 1;\n", HEADER));
  }
}
